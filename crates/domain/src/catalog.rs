// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bundled default catalogs, used to seed an empty store.

use crate::types::CatalogEntry;

/// The operative type that requires a free-text specific type.
pub const OTHER_OPERATIVE_TYPE: &str = "OTRO OPERATIVO";

/// Prefix shared by the main territorial regions.
pub const MAIN_REGION_PREFIX: &str = "REGION";

/// Default operative types, in display order.
pub const DEFAULT_OPERATIVE_TYPES: [&str; 8] = [
    "OPERATIVO CARRUSEL",
    "OPERATIVO ALCOHOLIMETRO",
    "OPERATIVO MOTOCICLETAS",
    "OPERATIVO TRANSPORTE PUBLICO",
    "OPERATIVO PIE TIERRA",
    "OPERATIVO ESCUELA SEGURA",
    "REUNION VECINAL",
    OTHER_OPERATIVE_TYPE,
];

/// Regions known to the municipality.
pub const REGIONS: [&str; 5] = [
    "REGION 1",
    "REGION 2",
    "REGION 3",
    "REGION 4",
    "AGRUPAMIENTO",
];

const DEFAULT_COLONIES: [(&str, &str, &str); 12] = [
    ("REGION 1", "C-1", "CENTRO"),
    ("REGION 1", "C-1", "LA MERCED"),
    ("REGION 1", "C-2", "SAN JUAN"),
    ("REGION 2", "C-3", "LOMAS DEL VALLE"),
    ("REGION 2", "C-3", "JARDINES DEL SUR"),
    ("REGION 2", "C-4", "EL MIRADOR"),
    ("REGION 3", "C-5", "INDEPENDENCIA"),
    ("REGION 3", "C-5", "SANTA CRUZ"),
    ("REGION 3", "C-6", "LOS PINOS"),
    ("REGION 4", "C-7", "LA ESPERANZA"),
    ("REGION 4", "C-7", "VALLE VERDE"),
    ("REGION 4", "C-8", "LAS FLORES"),
];

/// Returns the default operative types as owned strings.
#[must_use]
pub fn default_operative_types() -> Vec<String> {
    DEFAULT_OPERATIVE_TYPES
        .iter()
        .map(|name| (*name).to_string())
        .collect()
}

/// Returns the default colony catalog.
#[must_use]
pub fn default_colony_catalog() -> Vec<CatalogEntry> {
    DEFAULT_COLONIES
        .iter()
        .map(|(region, quadrant, colony)| CatalogEntry::new(region, quadrant, colony))
        .collect()
}

/// Returns true if `region` is one of the main territorial regions.
#[must_use]
pub fn is_main_region(region: &str) -> bool {
    region.trim().starts_with(MAIN_REGION_PREFIX)
}

/// Returns the colonies catalogued for a region and quadrant, sorted and deduplicated.
#[must_use]
pub fn colonies_for(catalog: &[CatalogEntry], region: &str, quadrant: &str) -> Vec<String> {
    let mut colonies: Vec<String> = catalog
        .iter()
        .filter(|entry| entry.region == region && entry.quadrant == quadrant)
        .map(|entry| entry.colony.clone())
        .collect();
    colonies.sort();
    colonies.dedup();
    colonies
}
