use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "flight_status")]
pub enum FlightStatus {
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "boarding")]
    Boarding,
    #[sea_orm(string_value = "departed")]
    Departed,
    #[sea_orm(string_value = "arrived")]
    Arrived,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl FlightStatus {
    /// Allowed moves: scheduled -> boarding -> departed -> arrived,
    /// with cancellation possible until the aircraft has departed.
    pub fn can_transition_to(&self, target: &FlightStatus) -> bool {
        matches!(
            (self, target),
            (FlightStatus::Scheduled, FlightStatus::Boarding)
                | (FlightStatus::Boarding, FlightStatus::Departed)
                | (FlightStatus::Departed, FlightStatus::Arrived)
                | (FlightStatus::Scheduled, FlightStatus::Cancelled)
                | (FlightStatus::Boarding, FlightStatus::Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FlightStatus::Arrived | FlightStatus::Cancelled)
    }

    /// A flight holds its gate only while it is still on the ground side.
    pub fn occupies_gate(&self) -> bool {
        matches!(self, FlightStatus::Scheduled | FlightStatus::Boarding)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flights")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub flight_no: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTimeWithTimeZone,
    pub scheduled_arrival: DateTimeWithTimeZone,
    pub aircraft_type: String,
    pub status: FlightStatus,
    pub gate_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::gate::Entity",
        from = "Column::GateId",
        to = "super::gate::Column::Id"
    )]
    Gate,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::gate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gate.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(FlightStatus::Scheduled.can_transition_to(&FlightStatus::Boarding));
        assert!(FlightStatus::Boarding.can_transition_to(&FlightStatus::Departed));
        assert!(FlightStatus::Departed.can_transition_to(&FlightStatus::Arrived));
    }

    #[test]
    fn test_cancellation_only_before_departure() {
        assert!(FlightStatus::Scheduled.can_transition_to(&FlightStatus::Cancelled));
        assert!(FlightStatus::Boarding.can_transition_to(&FlightStatus::Cancelled));
        assert!(!FlightStatus::Departed.can_transition_to(&FlightStatus::Cancelled));
        assert!(!FlightStatus::Arrived.can_transition_to(&FlightStatus::Cancelled));
    }

    #[test]
    fn test_no_skipping_or_reversing() {
        assert!(!FlightStatus::Scheduled.can_transition_to(&FlightStatus::Departed));
        assert!(!FlightStatus::Scheduled.can_transition_to(&FlightStatus::Arrived));
        assert!(!FlightStatus::Boarding.can_transition_to(&FlightStatus::Scheduled));
        assert!(!FlightStatus::Departed.can_transition_to(&FlightStatus::Boarding));
    }

    #[test]
    fn test_terminal_states() {
        assert!(FlightStatus::Arrived.is_terminal());
        assert!(FlightStatus::Cancelled.is_terminal());
        assert!(!FlightStatus::Scheduled.is_terminal());
        assert!(!FlightStatus::Boarding.is_terminal());
        assert!(!FlightStatus::Departed.is_terminal());
    }

    #[test]
    fn test_gate_occupancy_follows_status() {
        assert!(FlightStatus::Scheduled.occupies_gate());
        assert!(FlightStatus::Boarding.occupies_gate());
        assert!(!FlightStatus::Departed.occupies_gate());
        assert!(!FlightStatus::Arrived.occupies_gate());
        assert!(!FlightStatus::Cancelled.occupies_gate());
    }
}
