use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BusStatus {
    Active,
    Delayed,
    Maintenance,
    Other,
}

impl BusStatus {
    pub const ALL: [BusStatus; 4] = [
        BusStatus::Active,
        BusStatus::Delayed,
        BusStatus::Maintenance,
        BusStatus::Other,
    ];

    /// Marker colour on the map.
    pub fn color(self) -> &'static str {
        match self {
            BusStatus::Active => "#059669",
            BusStatus::Delayed => "#f59e0b",
            BusStatus::Maintenance => "#ef4444",
            BusStatus::Other => "#6b7280",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BusStatus::Active => "Active",
            BusStatus::Delayed => "Delayed",
            BusStatus::Maintenance => "Maintenance",
            BusStatus::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Bus {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub status: BusStatus,
    pub route: String,
}

/// Polyline drawn on the map, with its popup name.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Route {
    pub name: String,
    pub color: String,
    /// `[lat, lng]` pairs in drawing order.
    pub points: Vec<[f64; 2]>,
}

/// What the map view draws for one bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub color: &'static str,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub status: BusStatus,
    pub color: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    buses: Vec<Bus>,
    routes: Vec<Route>,
}

impl Roster {
    pub fn new(buses: Vec<Bus>, routes: Vec<Route>) -> Self {
        Self { buses, routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    pub fn count(&self, status: BusStatus) -> usize {
        self.buses.iter().filter(|b| b.status == status).count()
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.buses
            .iter()
            .map(|b| Marker {
                id: b.id.clone(),
                lat: b.lat,
                lng: b.lng,
                color: b.status.color(),
                popup: format!(
                    "Bus #{} | Route: {} | Status: {}",
                    b.id,
                    b.route,
                    b.status.label()
                ),
            })
            .collect()
    }

    /// Per-status counts, skipping statuses nobody has.
    pub fn legend(&self) -> Vec<LegendEntry> {
        BusStatus::ALL
            .iter()
            .map(|&status| LegendEntry {
                status,
                color: status.color(),
                count: self.count(status),
            })
            .filter(|e| e.count > 0)
            .collect()
    }
}
