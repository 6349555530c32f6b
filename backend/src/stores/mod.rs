//! Pharmacy locator over a fixed list of stores.

use crate::models::{MapCenter, Store, StoreType, StoreView};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// How many stores the nearest-store lookup returns.
pub const NEAREST_COUNT: usize = 5;

/// Map center when no city (or an unknown city) is selected.
pub const DEFAULT_CENTER: MapCenter = MapCenter {
    lat: 30.3753,
    lng: 69.3451,
    zoom: 6,
};

const STORES: &[Store] = &[
    Store {
        id: 1,
        name: "Al-Shifa Medical Store",
        store_type: StoreType::Store,
        city: "lakki-marwat",
        address: "Main Bazaar, Lakki Marwat",
        phone: "0966-123456",
        timing: "9:00 AM - 11:00 PM",
        emergency: false,
        lat: 32.6071,
        lng: 70.9129,
        services: &["Prescription Medicines", "OTC Drugs", "Medical Equipment"],
        description: "One of the oldest medical stores in Lakki Marwat, providing quality medicines and healthcare products.",
    },
    Store {
        id: 2,
        name: "Marwat Pharmacy",
        store_type: StoreType::Pharmacy,
        city: "lakki-marwat",
        address: "City Center, Lakki Marwat",
        phone: "0966-234567",
        timing: "24/7",
        emergency: true,
        lat: 32.6050,
        lng: 70.9150,
        services: &["24/7 Service", "Emergency Medicines", "Prescription", "First Aid"],
        description: "24/7 pharmacy providing emergency medical services in Lakki Marwat.",
    },
    Store {
        id: 3,
        name: "Lakki Medical Store",
        store_type: StoreType::Store,
        city: "lakki-marwat",
        address: "Hospital Road, Lakki Marwat",
        phone: "0966-345678",
        timing: "8:00 AM - 10:00 PM",
        emergency: false,
        lat: 32.6080,
        lng: 70.9100,
        services: &["All Medicines", "Surgical Items", "Baby Care"],
        description: "Complete medical store with wide range of healthcare products.",
    },
    Store {
        id: 4,
        name: "Islamabad Medical Center",
        store_type: StoreType::Hospital,
        city: "islamabad",
        address: "Blue Area, Islamabad",
        phone: "051-1234567",
        timing: "24/7",
        emergency: true,
        lat: 33.6844,
        lng: 73.0479,
        services: &["Hospital Pharmacy", "Emergency", "Specialized Medicines"],
        description: "Hospital pharmacy with complete range of medicines and emergency services.",
    },
    Store {
        id: 5,
        name: "F-10 Pharmacy",
        store_type: StoreType::Pharmacy,
        city: "islamabad",
        address: "F-10 Markaz, Islamabad",
        phone: "051-2345678",
        timing: "8:00 AM - 12:00 AM",
        emergency: true,
        lat: 33.6900,
        lng: 73.0500,
        services: &["Prescription", "OTC", "Health Supplements"],
        description: "Modern pharmacy with trained pharmacists.",
    },
    Store {
        id: 6,
        name: "Raja Bazaar Medical Store",
        store_type: StoreType::Store,
        city: "rawalpindi",
        address: "Raja Bazaar, Rawalpindi",
        phone: "051-3456789",
        timing: "9:00 AM - 11:00 PM",
        emergency: false,
        lat: 33.6007,
        lng: 73.0679,
        services: &["All Medicines", "Surgical", "Equipment"],
        description: "Large medical store in busy commercial area.",
    },
    Store {
        id: 7,
        name: "Shalimar Pharmacy",
        store_type: StoreType::Pharmacy,
        city: "lahore",
        address: "Shalimar Link Road, Lahore",
        phone: "042-1234567",
        timing: "24/7",
        emergency: true,
        lat: 31.5497,
        lng: 74.3436,
        services: &["24/7", "Emergency", "Home Delivery"],
        description: "24-hour pharmacy with emergency services.",
    },
    Store {
        id: 8,
        name: "Karachi Medical Store",
        store_type: StoreType::Store,
        city: "karachi",
        address: "Tariq Road, Karachi",
        phone: "021-1234567",
        timing: "9:00 AM - 11:00 PM",
        emergency: false,
        lat: 24.8607,
        lng: 67.0011,
        services: &["Imported Medicines", "Surgical", "Equipment"],
        description: "Well-stocked medical store with imported medicines.",
    },
    Store {
        id: 9,
        name: "Peshawar Pharmacy",
        store_type: StoreType::Pharmacy,
        city: "peshawar",
        address: "University Road, Peshawar",
        phone: "091-1234567",
        timing: "24/7",
        emergency: true,
        lat: 34.0151,
        lng: 71.5249,
        services: &["Emergency", "Prescription", "Consultation"],
        description: "24/7 pharmacy with pharmacist consultation.",
    },
    Store {
        id: 10,
        name: "Quetta Medical Center",
        store_type: StoreType::Hospital,
        city: "quetta",
        address: "Jinnah Road, Quetta",
        phone: "081-1234567",
        timing: "24/7",
        emergency: true,
        lat: 30.1798,
        lng: 66.9750,
        services: &["Hospital Pharmacy", "Emergency", "Special Care"],
        description: "Hospital-based pharmacy with emergency services.",
    },
    Store {
        id: 11,
        name: "Multan Medical Store",
        store_type: StoreType::Store,
        city: "multan",
        address: "Bosan Road, Multan",
        phone: "061-1234567",
        timing: "8:00 AM - 10:00 PM",
        emergency: false,
        lat: 30.1575,
        lng: 71.5249,
        services: &["All Medicines", "Surgical", "Healthcare"],
        description: "Complete medical store serving Multan area.",
    },
    Store {
        id: 12,
        name: "Faisalabad Pharmacy",
        store_type: StoreType::Pharmacy,
        city: "faisalabad",
        address: "Kohinoor City, Faisalabad",
        phone: "041-1234567",
        timing: "24/7",
        emergency: true,
        lat: 31.4504,
        lng: 73.1350,
        services: &["24/7", "Emergency", "Delivery"],
        description: "24-hour pharmacy with delivery service.",
    },
];

/// City slug, display name, and map center.
const CITIES: &[(&str, &str, MapCenter)] = &[
    ("lakki-marwat", "Lakki Marwat", MapCenter { lat: 32.6071, lng: 70.9129, zoom: 13 }),
    ("islamabad", "Islamabad", MapCenter { lat: 33.6844, lng: 73.0479, zoom: 12 }),
    ("rawalpindi", "Rawalpindi", MapCenter { lat: 33.6007, lng: 73.0679, zoom: 12 }),
    ("lahore", "Lahore", MapCenter { lat: 31.5497, lng: 74.3436, zoom: 12 }),
    ("karachi", "Karachi", MapCenter { lat: 24.8607, lng: 67.0011, zoom: 12 }),
    ("peshawar", "Peshawar", MapCenter { lat: 34.0151, lng: 71.5249, zoom: 12 }),
    ("quetta", "Quetta", MapCenter { lat: 30.1798, lng: 66.9750, zoom: 12 }),
    ("multan", "Multan", MapCenter { lat: 30.1575, lng: 71.5249, zoom: 12 }),
    ("faisalabad", "Faisalabad", MapCenter { lat: 31.4504, lng: 73.1350, zoom: 12 }),
];

pub fn all_stores() -> &'static [Store] {
    STORES
}

pub fn get_store(id: i64) -> Option<&'static Store> {
    STORES.iter().find(|s| s.id == id)
}

/// Stores in `city`; "all" (or empty) returns every store.
pub fn stores_in_city(city: &str) -> Vec<&'static Store> {
    STORES
        .iter()
        .filter(|s| city.is_empty() || city == "all" || s.city == city)
        .collect()
}

/// Display name for a city slug; unknown slugs pass through.
pub fn city_name(slug: &str) -> String {
    CITIES
        .iter()
        .find(|(s, _, _)| *s == slug)
        .map(|(_, name, _)| name.to_string())
        .unwrap_or_else(|| slug.to_string())
}

/// Map center and zoom for a city filter.
pub fn city_center(slug: &str) -> MapCenter {
    CITIES
        .iter()
        .find(|(s, _, _)| *s == slug)
        .map(|(_, _, center)| *center)
        .unwrap_or(DEFAULT_CENTER)
}

/// Slugs and display names of every city with stores.
pub fn cities() -> Vec<(&'static str, &'static str)> {
    CITIES.iter().map(|(slug, name, _)| (*slug, *name)).collect()
}

pub fn directions_url(store: &Store) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        store.lat, store.lng
    )
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// The closest stores to a coordinate, nearest first.
pub fn nearest(lat: f64, lng: f64) -> Vec<(&'static Store, f64)> {
    let mut ranked: Vec<(&'static Store, f64)> = STORES
        .iter()
        .map(|s| (s, haversine_km(lat, lng, s.lat, s.lng)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.truncate(NEAREST_COUNT);
    ranked
}

/// Decorate a store for the client.
pub fn view(store: &Store, distance_km: Option<f64>) -> StoreView {
    StoreView {
        store: store.clone(),
        type_label: store.store_type.label(),
        type_icon: store.store_type.icon(),
        city_name: city_name(store.city),
        directions_url: directions_url(store),
        distance_km: distance_km.map(|d| (d * 100.0).round() / 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_filter() {
        assert_eq!(stores_in_city("all").len(), 12);
        assert_eq!(stores_in_city("").len(), 12);
        let lakki = stores_in_city("lakki-marwat");
        assert_eq!(lakki.len(), 3);
        assert!(lakki.iter().all(|s| s.city == "lakki-marwat"));
        assert!(stores_in_city("gilgit").is_empty());
    }

    #[test]
    fn test_haversine_known_distance() {
        // Islamabad to Lahore is roughly 270 km
        let d = haversine_km(33.6844, 73.0479, 31.5497, 74.3436);
        assert!((d - 267.0).abs() < 10.0, "distance was {}", d);
        assert_eq!(haversine_km(30.0, 70.0, 30.0, 70.0), 0.0);
    }

    #[test]
    fn test_nearest_from_lakki_marwat() {
        let ranked = nearest(32.6060, 70.9140);
        assert_eq!(ranked.len(), NEAREST_COUNT);
        let ids: Vec<i64> = ranked.iter().take(3).map(|(s, _)| s.id).collect();
        let mut sorted_ids = ids.clone();
        sorted_ids.sort();
        assert_eq!(sorted_ids, vec![1, 2, 3]);
        assert!(ranked.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_city_helpers() {
        assert_eq!(city_name("lakki-marwat"), "Lakki Marwat");
        assert_eq!(city_name("gilgit"), "gilgit");
        assert_eq!(city_center("lahore").zoom, 12);
        assert_eq!(city_center("all"), DEFAULT_CENTER);
        assert_eq!(city_center("nowhere"), DEFAULT_CENTER);
    }

    #[test]
    fn test_store_view() {
        let store = get_store(4).unwrap();
        let view = view(store, Some(12.3456));
        assert_eq!(view.type_label, "Hospital Pharmacy");
        assert_eq!(view.city_name, "Islamabad");
        assert_eq!(view.distance_km, Some(12.35));
        assert_eq!(
            view.directions_url,
            "https://www.google.com/maps/dir/?api=1&destination=33.6844,73.0479"
        );
    }
}
