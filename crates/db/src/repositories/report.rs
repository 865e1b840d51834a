//! Report repository: loads plain rows for the in-memory aggregation.
//!
//! Handlers ask this repository for flat `ServiceRow` / `PaymentRow`
//! vectors, already filtered by company, optional branch, and date window,
//! with display names joined in. The aggregation itself happens in
//! `fixhub-core`, which never sees `SeaORM` types.

use std::collections::{HashMap, HashSet};

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use fixhub_core::reports::{NamedRef, PaymentMethodRef, PaymentRow, ServiceRow, ServiceStatus};
use fixhub_core::window::DateWindow;

use crate::entities::{
    brands, customer_devices, customers, faults, payment_entries, payment_methods,
    sea_orm_active_enums, service_faults, services, users,
};

/// Report repository for read-only aggregation queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads flat service rows for a company, optionally restricted to one
    /// branch, created inside the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn load_service_rows(
        &self,
        company_id: Uuid,
        branch_id: Option<Uuid>,
        window: DateWindow,
    ) -> Result<Vec<ServiceRow>, DbErr> {
        let mut query = services::Entity::find()
            .filter(services::Column::CompanyId.eq(company_id))
            .filter(services::Column::CreatedAt.gte(window.start()))
            .filter(services::Column::CreatedAt.lte(window.end()));
        if let Some(branch_id) = branch_id {
            query = query.filter(services::Column::BranchId.eq(branch_id));
        }
        let rows = query
            .order_by_asc(services::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let user_names = self.user_names_for(&rows).await?;
        let device_brands = self.device_brands_for(&rows).await?;
        let fault_tags = self.fault_tags_for(&rows).await?;

        Ok(rows
            .into_iter()
            .map(|service| {
                let brand = service
                    .customer_device_id
                    .and_then(|device_id| device_brands.get(&device_id).cloned());
                let faults = fault_tags.get(&service.id).cloned().unwrap_or_default();

                ServiceRow {
                    id: service.id,
                    ticket_number: service.ticket_number,
                    status: status_to_core(&service.status),
                    estimated_cost: service.estimated_cost,
                    actual_cost: service.actual_cost,
                    created_at: service.created_at.to_utc(),
                    completed_at: service.completed_at.map(|at| at.to_utc()),
                    booked_by: service.created_by_id.map(|id| named(&user_names, id)),
                    technician: service.assigned_to_id.map(|id| named(&user_names, id)),
                    brand,
                    faults,
                }
            })
            .collect())
    }

    /// Loads flat payment rows for a company inside the given window.
    ///
    /// With a branch filter, only entries whose linked service belongs to
    /// that branch survive; entries with no linked service are excluded,
    /// since branch scoping is only possible through the service. Without a
    /// filter every entry of the company is returned, unlinked ones
    /// included.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn load_payment_rows(
        &self,
        company_id: Uuid,
        branch_id: Option<Uuid>,
        window: DateWindow,
    ) -> Result<Vec<PaymentRow>, DbErr> {
        let entries = payment_entries::Entity::find()
            .filter(payment_entries::Column::CompanyId.eq(company_id))
            .filter(payment_entries::Column::PaymentDate.gte(window.start()))
            .filter(payment_entries::Column::PaymentDate.lte(window.end()))
            .order_by_asc(payment_entries::Column::PaymentDate)
            .all(&self.db)
            .await?;

        let method_names: HashMap<Uuid, String> = payment_methods::Entity::find()
            .filter(payment_methods::Column::CompanyId.eq(company_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|method| (method.id, method.name))
            .collect();

        let service_info = self.service_info_for(&entries).await?;

        Ok(entries
            .into_iter()
            .filter(|entry| match branch_id {
                Some(branch_id) => entry
                    .service_id
                    .and_then(|id| service_info.get(&id))
                    .is_some_and(|info| info.branch_id == branch_id),
                None => true,
            })
            .map(|entry| {
                let info = entry.service_id.and_then(|id| service_info.get(&id));
                PaymentRow {
                    id: entry.id,
                    amount: entry.amount,
                    paid_at: entry.payment_date.to_utc(),
                    method_id: entry.payment_method_id,
                    method_name: method_names
                        .get(&entry.payment_method_id)
                        .cloned()
                        .unwrap_or_default(),
                    service_id: entry.service_id,
                    ticket_number: info.map(|i| i.ticket_number.clone()),
                    customer_name: info.and_then(|i| i.customer_name.clone()),
                    notes: entry.notes,
                    transaction_id: entry.transaction_id,
                }
            })
            .collect())
    }

    /// Loads the currently-active payment methods of a company, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn active_payment_methods(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<PaymentMethodRef>, DbErr> {
        let methods = payment_methods::Entity::find()
            .filter(payment_methods::Column::CompanyId.eq(company_id))
            .filter(payment_methods::Column::IsActive.eq(true))
            .order_by_asc(payment_methods::Column::Name)
            .all(&self.db)
            .await?;

        Ok(methods
            .into_iter()
            .map(|method| PaymentMethodRef {
                id: method.id,
                name: method.name,
            })
            .collect())
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Resolves display names for every booking user and technician.
    async fn user_names_for(
        &self,
        rows: &[services::Model],
    ) -> Result<HashMap<Uuid, String>, DbErr> {
        let user_ids: HashSet<Uuid> = rows
            .iter()
            .flat_map(|s| [s.created_by_id, s.assigned_to_id])
            .flatten()
            .collect();
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let found = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids.into_iter().collect::<Vec<_>>()))
            .all(&self.db)
            .await?;
        Ok(found.into_iter().map(|u| (u.id, u.name)).collect())
    }

    /// Resolves the brand reference per linked customer device.
    async fn device_brands_for(
        &self,
        rows: &[services::Model],
    ) -> Result<HashMap<Uuid, NamedRef>, DbErr> {
        let device_ids: Vec<Uuid> = rows.iter().filter_map(|s| s.customer_device_id).collect();
        if device_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let devices = customer_devices::Entity::find()
            .filter(customer_devices::Column::Id.is_in(device_ids))
            .all(&self.db)
            .await?;

        let brand_ids: Vec<Uuid> = devices.iter().filter_map(|d| d.brand_id).collect();
        let brand_names: HashMap<Uuid, String> = if brand_ids.is_empty() {
            HashMap::new()
        } else {
            brands::Entity::find()
                .filter(brands::Column::Id.is_in(brand_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|b| (b.id, b.name))
                .collect()
        };

        // Devices without a brand produce no entry, so the service row ends
        // up brandless and is skipped by the brand grouping.
        Ok(devices
            .into_iter()
            .filter_map(|device| {
                let brand_id = device.brand_id?;
                Some((device.id, named(&brand_names, brand_id)))
            })
            .collect())
    }

    /// Resolves the fault tags per service.
    async fn fault_tags_for(
        &self,
        rows: &[services::Model],
    ) -> Result<HashMap<Uuid, Vec<NamedRef>>, DbErr> {
        let service_ids: Vec<Uuid> = rows.iter().map(|s| s.id).collect();
        if service_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = service_faults::Entity::find()
            .filter(service_faults::Column::ServiceId.is_in(service_ids))
            .all(&self.db)
            .await?;

        let fault_ids: HashSet<Uuid> = links.iter().map(|l| l.fault_id).collect();
        let fault_names: HashMap<Uuid, String> = if fault_ids.is_empty() {
            HashMap::new()
        } else {
            faults::Entity::find()
                .filter(faults::Column::Id.is_in(fault_ids.into_iter().collect::<Vec<_>>()))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|f| (f.id, f.name))
                .collect()
        };

        let mut tags: HashMap<Uuid, Vec<NamedRef>> = HashMap::new();
        for link in links {
            tags.entry(link.service_id)
                .or_default()
                .push(named(&fault_names, link.fault_id));
        }
        Ok(tags)
    }

    /// Resolves branch, ticket number, and customer name per linked service.
    async fn service_info_for(
        &self,
        entries: &[payment_entries::Model],
    ) -> Result<HashMap<Uuid, LinkedServiceInfo>, DbErr> {
        let service_ids: Vec<Uuid> = entries.iter().filter_map(|e| e.service_id).collect();
        if service_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let linked = services::Entity::find()
            .filter(services::Column::Id.is_in(service_ids))
            .all(&self.db)
            .await?;

        let customer_ids: HashSet<Uuid> = linked.iter().map(|s| s.customer_id).collect();
        let customer_names: HashMap<Uuid, String> = if customer_ids.is_empty() {
            HashMap::new()
        } else {
            customers::Entity::find()
                .filter(customers::Column::Id.is_in(customer_ids.into_iter().collect::<Vec<_>>()))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect()
        };

        Ok(linked
            .into_iter()
            .map(|service| {
                let customer_name = customer_names.get(&service.customer_id).cloned();
                (
                    service.id,
                    LinkedServiceInfo {
                        branch_id: service.branch_id,
                        ticket_number: service.ticket_number,
                        customer_name,
                    },
                )
            })
            .collect())
    }
}

/// Branch/ticket/customer context of a payment's linked service.
#[derive(Debug, Clone)]
struct LinkedServiceInfo {
    branch_id: Uuid,
    ticket_number: String,
    customer_name: Option<String>,
}

/// Builds a `NamedRef`, falling back to an empty name for dangling ids.
fn named(names: &HashMap<Uuid, String>, id: Uuid) -> NamedRef {
    NamedRef {
        id,
        name: names.get(&id).cloned().unwrap_or_default(),
    }
}

/// Maps the stored status enum onto the core status.
fn status_to_core(status: &sea_orm_active_enums::ServiceStatus) -> ServiceStatus {
    use sea_orm_active_enums::ServiceStatus as Db;

    match status {
        Db::Received => ServiceStatus::Received,
        Db::Diagnosed => ServiceStatus::Diagnosed,
        Db::InProgress => ServiceStatus::InProgress,
        Db::WaitingForParts => ServiceStatus::WaitingForParts,
        Db::Completed => ServiceStatus::Completed,
        Db::Delivered => ServiceStatus::Delivered,
        Db::Cancelled => ServiceStatus::Cancelled,
        Db::NotServiceable => ServiceStatus::NotServiceable,
    }
}
