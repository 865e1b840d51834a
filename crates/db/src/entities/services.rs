//! `SeaORM` Entity for the services table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ServiceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub branch_id: Uuid,
    #[sea_orm(unique)]
    pub ticket_number: String,
    pub customer_id: Uuid,
    pub customer_device_id: Option<Uuid>,
    pub status: ServiceStatus,
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
    pub created_by_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id"
    )]
    Branches,
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::customer_devices::Entity",
        from = "Column::CustomerDeviceId",
        to = "super::customer_devices::Column::Id"
    )]
    CustomerDevices,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedById",
        to = "super::users::Column::Id"
    )]
    CreatedBy,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedToId",
        to = "super::users::Column::Id"
    )]
    AssignedTo,
    #[sea_orm(has_many = "super::service_faults::Entity")]
    ServiceFaults,
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branches.def()
    }
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::service_faults::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceFaults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
