use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "baggage_type")]
pub enum BaggageType {
    #[sea_orm(string_value = "checked")]
    Checked,
    #[sea_orm(string_value = "carry_on")]
    CarryOn,
    #[sea_orm(string_value = "oversized")]
    Oversized,
    #[sea_orm(string_value = "fragile")]
    Fragile,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "baggage_status")]
pub enum BaggageStatus {
    #[sea_orm(string_value = "checked_in")]
    CheckedIn,
    #[sea_orm(string_value = "loaded")]
    Loaded,
    #[sea_orm(string_value = "in_transit")]
    InTransit,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "lost")]
    Lost,
}

impl BaggageStatus {
    /// Forward-only along checked_in -> loaded -> in_transit -> delivered.
    /// A bag can be declared lost from any non-terminal state.
    pub fn can_transition_to(&self, target: &BaggageStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, target),
            (BaggageStatus::CheckedIn, BaggageStatus::Loaded)
                | (BaggageStatus::Loaded, BaggageStatus::InTransit)
                | (BaggageStatus::InTransit, BaggageStatus::Delivered)
                | (_, BaggageStatus::Lost)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BaggageStatus::Delivered | BaggageStatus::Lost)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "baggage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub booking_id: i32,
    pub weight_kg: f64,
    #[sea_orm(unique)]
    pub baggage_tag: String,
    pub baggage_type: BaggageType,
    pub status: BaggageStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(BaggageStatus::CheckedIn.can_transition_to(&BaggageStatus::Loaded));
        assert!(BaggageStatus::Loaded.can_transition_to(&BaggageStatus::InTransit));
        assert!(BaggageStatus::InTransit.can_transition_to(&BaggageStatus::Delivered));
    }

    #[test]
    fn test_lost_reachable_from_any_non_terminal() {
        assert!(BaggageStatus::CheckedIn.can_transition_to(&BaggageStatus::Lost));
        assert!(BaggageStatus::Loaded.can_transition_to(&BaggageStatus::Lost));
        assert!(BaggageStatus::InTransit.can_transition_to(&BaggageStatus::Lost));
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!BaggageStatus::CheckedIn.can_transition_to(&BaggageStatus::InTransit));
        assert!(!BaggageStatus::CheckedIn.can_transition_to(&BaggageStatus::Delivered));
        assert!(!BaggageStatus::Loaded.can_transition_to(&BaggageStatus::Delivered));
    }

    #[test]
    fn test_no_reversing() {
        assert!(!BaggageStatus::Loaded.can_transition_to(&BaggageStatus::CheckedIn));
        assert!(!BaggageStatus::InTransit.can_transition_to(&BaggageStatus::Loaded));
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for target in [
            BaggageStatus::CheckedIn,
            BaggageStatus::Loaded,
            BaggageStatus::InTransit,
            BaggageStatus::Delivered,
            BaggageStatus::Lost,
        ] {
            assert!(!BaggageStatus::Delivered.can_transition_to(&target));
            assert!(!BaggageStatus::Lost.can_transition_to(&target));
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        assert!(!BaggageStatus::CheckedIn.can_transition_to(&BaggageStatus::CheckedIn));
        assert!(!BaggageStatus::Loaded.can_transition_to(&BaggageStatus::Loaded));
    }
}
