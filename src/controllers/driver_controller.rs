use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::dto::driver_dto::DriverInput;
use crate::models::{Driver, DriverSummary};
use crate::repositories::{DocumentStore, DriverRepository, UserRepository};
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::require_fields;

pub struct DriverController {
    drivers: DriverRepository,
    users: UserRepository,
}

impl DriverController {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            drivers: DriverRepository::new(store.clone()),
            users: UserRepository::new(store),
        }
    }

    /// Fichas de conductor más los usuarios con puesto de conductor
    pub async fn list(&self) -> AppResult<Vec<DriverSummary>> {
        let mut drivers: Vec<DriverSummary> = self.drivers.list().await?.iter().map(DriverSummary::from).collect();
        let from_users: Vec<DriverSummary> = self
            .users
            .list()
            .await?
            .iter()
            .filter(|u| u.is_driver() && !drivers.iter().any(|d| d.id == u.id))
            .map(DriverSummary::from)
            .collect();
        drivers.extend(from_users);
        Ok(drivers)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Driver> {
        self.drivers
            .get(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", id))
    }

    pub async fn create(&self, input: DriverInput) -> AppResult<Driver> {
        require_fields(
            &[
                input.first_name.as_deref(),
                input.last_name.as_deref(),
                input.license_number.as_deref(),
            ],
            "firstName, lastName, licenseNumber are required",
        )?;

        let driver = Driver {
            id: input
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            first_name: input.first_name.unwrap_or_default(),
            last_name: input.last_name.unwrap_or_default(),
            license_number: input.license_number.unwrap_or_default(),
            rank: input.rank,
            phone: input.phone,
            notes: input.notes,
            photo_url: input.photo_url,
        };
        self.drivers.upsert(&driver).await?;
        info!("🪪 Conductor creado: {} {}", driver.last_name, driver.first_name);
        Ok(driver)
    }

    pub async fn update(&self, id: &str, input: DriverInput) -> AppResult<Driver> {
        let mut driver = self.get_by_id(id).await?;

        if let Some(first_name) = input.first_name {
            driver.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            driver.last_name = last_name;
        }
        if let Some(license_number) = input.license_number {
            driver.license_number = license_number;
        }
        if input.rank.is_some() {
            driver.rank = input.rank;
        }
        if input.phone.is_some() {
            driver.phone = input.phone;
        }
        if input.notes.is_some() {
            driver.notes = input.notes;
        }
        if input.photo_url.is_some() {
            driver.photo_url = input.photo_url;
        }

        self.drivers.upsert(&driver).await?;
        Ok(driver)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.drivers.delete(id).await? {
            return Err(not_found_error("Driver", id));
        }
        info!("🗑️ Conductor {} eliminado", id);
        Ok(())
    }
}
