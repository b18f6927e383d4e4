use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "check_in_status")]
pub enum CheckInStatus {
    #[sea_orm(string_value = "not_checked_in")]
    NotCheckedIn,
    #[sea_orm(string_value = "checked_in")]
    CheckedIn,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub flight_id: i32,
    pub passenger_name: String,
    pub seat_number: Option<String>,
    #[sea_orm(unique)]
    pub booking_reference: String,
    pub passport_no: Option<String>,
    pub check_in_status: CheckInStatus,
    pub check_in_time: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::flight::Entity",
        from = "Column::FlightId",
        to = "super::flight::Column::Id"
    )]
    Flight,
    #[sea_orm(has_many = "super::baggage::Entity")]
    Baggage,
}

impl Related<super::flight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flight.def()
    }
}

impl Related<super::baggage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Baggage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
