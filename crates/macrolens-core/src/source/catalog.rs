//! Static catalog of suggested SGS series

use crate::models::CatalogEntry;

/// Suggested series, in display order
pub const CATALOG: [CatalogEntry; 20] = [
    CatalogEntry { code: 432, name: "SELIC (meta) – % a.a." },
    CatalogEntry { code: 1, name: "Dólar comercial (venda)" },
    CatalogEntry { code: 10813, name: "Dólar comercial (compra)" },
    CatalogEntry { code: 433, name: "IPCA – variação mensal" },
    CatalogEntry { code: 4389, name: "CDI – % a.d." },
    CatalogEntry { code: 11, name: "SELIC diária" },
    CatalogEntry { code: 4380, name: "PIB mensal – valores correntes" },
    CatalogEntry { code: 25433, name: "IPCA-15 – variação mensal" },
    CatalogEntry { code: 1178, name: "Série SGS #1178" },
    CatalogEntry { code: 226, name: "Série SGS #226" },
    CatalogEntry { code: 188, name: "Série SGS #188" },
    CatalogEntry { code: 189, name: "Série SGS #189" },
    CatalogEntry { code: 190, name: "Série SGS #190" },
    CatalogEntry { code: 4390, name: "Série SGS #4390" },
    CatalogEntry { code: 21619, name: "Série SGS #21619" },
    CatalogEntry { code: 21620, name: "Série SGS #21620" },
    CatalogEntry { code: 24363, name: "Série SGS #24363" },
    CatalogEntry { code: 24364, name: "Série SGS #24364" },
    CatalogEntry { code: 22707, name: "Série SGS #22707" },
    CatalogEntry { code: 22708, name: "Série SGS #22708" },
];

/// Friendly name for a series code, or a generic one for codes outside the catalog
pub fn series_name(code: i64) -> String {
    CATALOG
        .iter()
        .find(|entry| entry.code == code)
        .map(|entry| entry.name.to_string())
        .unwrap_or_else(|| format!("Série BCB #{}", code))
}
