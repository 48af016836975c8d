// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{TestContext, admin, create_test_user};
use crate::error::ApiError;
use crate::handlers::get_statistics;
use crate::request_response::StatisticsQuery;
use crate::statistics::{
    LabelCount, OperativeStatistics, StatisticsFilter, compute_statistics, type_label,
};
use operativos_domain::{
    CatalogEntry, Location, Operative, OperativeRecord, OperativeStatus, Role, Shift, Unit,
    default_colony_catalog,
};

fn operative(
    id: &str,
    region: &str,
    operative_type: &str,
    colony: &str,
    date: &str,
    shift: Shift,
) -> Operative {
    Operative::try_from(OperativeRecord {
        id: id.to_string(),
        operative_type: operative_type.to_string(),
        specific_type: None,
        start_date: date.to_string(),
        start_time: String::from("10:00"),
        status: OperativeStatus::Active,
        region: region.to_string(),
        quadrant: String::from("C-1"),
        shift,
        location: Location {
            latitude: 19.4,
            longitude: -99.1,
            colony: colony.to_string(),
            street: String::from("MADERO"),
            corner: String::new(),
        },
        units: vec![Unit {
            id: format!("{id}-U1"),
            unit_type: String::from("PATRULLA"),
            unit_number: String::from("P-1"),
            in_charge: String::from("JUAN PEREZ"),
            rank: String::from("OFICIAL"),
            personnel_count: 2,
        }],
        institutions: Vec::new(),
        conclusion: None,
        created_by: String::from("1"),
    })
    .unwrap()
}

fn sample() -> Vec<Operative> {
    vec![
        operative("A", "REGION 1", "OPERATIVO CARRUSEL", "CENTRO", "2024-03-05", Shift::First),
        operative("B", "REGION 1", "OPERATIVO CARRUSEL", "CENTRO", "2024-03-06", Shift::Second),
        operative(
            "C",
            "REGION 2",
            "OPERATIVO ALCOHOLIMETRO",
            "EL MIRADOR",
            "2024-04-01",
            Shift::First,
        ),
        operative("D", "AGRUPAMIENTO", "REUNION VECINAL", "Centro", "2024-04-02", Shift::Daily),
        operative(
            "E",
            "REGION 4",
            "OPERATIVO CARRUSEL",
            "COLONIA NUEVA",
            "fecha rota",
            Shift::First,
        ),
    ]
}

fn count(label: &str, count: usize) -> LabelCount {
    LabelCount {
        label: label.to_string(),
        count,
    }
}

#[test]
fn test_type_label_is_last_word() {
    assert_eq!(type_label("Operativo Alcoholímetro"), "ALCOHOLIMETRO");
    assert_eq!(type_label("REUNION VECINAL"), "VECINAL");
    assert_eq!(type_label("   "), "OTROS");
}

#[test]
fn test_statistics_over_everything() {
    let operatives: Vec<Operative> = sample();
    let refs: Vec<&Operative> = operatives.iter().collect();
    let catalog: Vec<CatalogEntry> = default_colony_catalog();

    let stats: OperativeStatistics =
        compute_statistics(&refs, &catalog, &StatisticsFilter::default());

    assert_eq!(stats.total, 5);
    assert_eq!(stats.active_regions, 4);
    assert_eq!(
        stats.by_region,
        vec![
            count("REGION 1", 2),
            count("REGION 2", 1),
            count("REGION 3", 0),
            count("REGION 4", 1),
        ]
    );
    assert_eq!(
        stats.by_type,
        vec![count("CARRUSEL", 3), count("ALCOHOLIMETRO", 1), count("VECINAL", 1)]
    );
    assert_eq!(stats.top_colonies[0], count("CENTRO", 3));
    assert_eq!(stats.top_colonies.len(), 3);
    assert_eq!(stats.uncovered_colonies, catalog.len() - 2);
}

#[test]
fn test_month_filter_skips_unparseable_dates() {
    let operatives: Vec<Operative> = sample();
    let refs: Vec<&Operative> = operatives.iter().collect();
    let filter: StatisticsFilter = StatisticsFilter {
        month: Some(3),
        ..StatisticsFilter::default()
    };

    let stats: OperativeStatistics = compute_statistics(&refs, &[], &filter);

    assert_eq!(stats.total, 2);
    assert_eq!(stats.uncovered_colonies, 0);
}

#[test]
fn test_region_and_shift_filters_combine() {
    let operatives: Vec<Operative> = sample();
    let refs: Vec<&Operative> = operatives.iter().collect();
    let filter: StatisticsFilter = StatisticsFilter {
        region: Some(String::from("region 1")),
        shift: Some(Shift::Second),
        month: None,
    };

    let stats: OperativeStatistics = compute_statistics(&refs, &[], &filter);

    assert_eq!(stats.total, 1);
    assert_eq!(stats.active_regions, 1);
}

#[test]
fn test_top_types_and_colonies_are_capped() {
    let operatives: Vec<Operative> = (0..8)
        .map(|i| {
            operative(
                &format!("T{i}"),
                "REGION 1",
                &format!("OPERATIVO TIPO{i}"),
                &format!("COLONIA {i}"),
                "2024-03-05",
                Shift::First,
            )
        })
        .collect();
    let refs: Vec<&Operative> = operatives.iter().collect();

    let stats: OperativeStatistics = compute_statistics(&refs, &[], &StatisticsFilter::default());

    assert_eq!(stats.by_type.len(), 4);
    assert_eq!(stats.by_type[0], count("TIPO0", 1));
    assert_eq!(stats.top_colonies.len(), 3);
    assert_eq!(stats.top_colonies[0], count("COLONIA 0", 1));
}

#[test]
fn test_get_statistics_treats_todos_as_no_filter() {
    let mut ctx: TestContext = TestContext::seeded();
    ctx.create_operative_as(&admin(), "OPERATIVO CARRUSEL", "REGION 1");

    let stats: OperativeStatistics = get_statistics(
        &ctx.state,
        &admin(),
        &StatisticsQuery {
            region: Some(String::from("TODOS")),
            shift: Some(String::from("todos")),
            month: None,
        },
    )
    .unwrap();

    assert_eq!(stats.total, 1);
}

#[test]
fn test_get_statistics_validates_query() {
    let ctx: TestContext = TestContext::seeded();

    let bad_month = get_statistics(
        &ctx.state,
        &admin(),
        &StatisticsQuery {
            month: Some(13),
            ..StatisticsQuery::default()
        },
    );
    assert!(matches!(
        bad_month,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "month"
    ));

    let bad_shift = get_statistics(
        &ctx.state,
        &admin(),
        &StatisticsQuery {
            shift: Some(String::from("TERCERO")),
            ..StatisticsQuery::default()
        },
    );
    assert!(matches!(
        bad_shift,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "shift"
    ));
}

#[test]
fn test_statistics_require_permission() {
    let ctx: TestContext = TestContext::seeded();
    let patrolman = create_test_user("2", Role::Patrolman, Some("REGION 1"));

    let result = get_statistics(&ctx.state, &patrolman, &StatisticsQuery::default());

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_statistics_are_scoped_to_visible_operatives() {
    let mut ctx: TestContext = TestContext::seeded();
    let regional = ctx.add_user(create_test_user("2", Role::Regional, Some("REGION 2")));
    ctx.create_operative_as(&admin(), "OPERATIVO CARRUSEL", "REGION 1");
    ctx.create_operative_as(&admin(), "OPERATIVO CARRUSEL", "REGION 2");

    let stats: OperativeStatistics =
        get_statistics(&ctx.state, &regional, &StatisticsQuery::default()).unwrap();

    assert_eq!(stats.total, 1);
    assert_eq!(stats.by_region[1], count("REGION 2", 1));
}
