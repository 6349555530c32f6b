//! Pharmacy locator models.

use serde::Serialize;

/// Kind of outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    Store,
    Pharmacy,
    Hospital,
}

impl StoreType {
    pub fn label(&self) -> &'static str {
        match self {
            StoreType::Pharmacy => "Pharmacy",
            StoreType::Hospital => "Hospital Pharmacy",
            StoreType::Store => "Medical Store",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StoreType::Pharmacy => "fa-prescription-bottle-alt",
            StoreType::Hospital => "fa-hospital",
            StoreType::Store => "fa-store",
        }
    }
}

/// A static pharmacy/hospital record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i64,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub store_type: StoreType,
    pub city: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub timing: &'static str,
    pub emergency: bool,
    pub lat: f64,
    pub lng: f64,
    pub services: &'static [&'static str],
    pub description: &'static str,
}

/// Store decorated with display fields for a marker or list row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreView {
    #[serde(flatten)]
    pub store: Store,
    pub type_label: &'static str,
    pub type_icon: &'static str,
    pub city_name: String,
    pub directions_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Map center for a city filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}
