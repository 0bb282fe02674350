//! PostgreSQL-backed `PrintSettingsRepository` (one row per business).

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{PrintSettingsRepository, PrintSettingsRepositoryError};
use crate::domain::{AccountId, PaperSize, PrintSettings, PrintSettingsError, PrinterType};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{PrintSettingsRecord, PrintSettingsRow};
use super::pool::{DbPool, PoolError};
use super::schema::print_settings;

#[derive(Clone)]
pub struct DieselPrintSettingsRepository {
    pool: DbPool,
}

impl DieselPrintSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PrintSettingsRepositoryError {
    map_basic_pool_error(error, PrintSettingsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PrintSettingsRepositoryError {
    map_basic_diesel_error(
        error,
        PrintSettingsRepositoryError::query,
        PrintSettingsRepositoryError::connection,
    )
}

fn parse_row(row: &PrintSettingsRow) -> Result<PrintSettings, PrintSettingsError> {
    let printer_type: PrinterType = row.printer_type.parse()?;
    let paper_size: PaperSize = row.paper_size.parse()?;
    let copies = u8::try_from(row.print_copies).unwrap_or(0);
    PrintSettings::new(
        printer_type,
        paper_size,
        row.include_timestamp,
        row.include_customer_info,
        row.include_business_logo,
        copies,
    )
}

fn row_to_settings(row: PrintSettingsRow) -> Result<PrintSettings, PrintSettingsRepositoryError> {
    parse_row(&row).map_err(|err| {
        warn!(error = %err, "stored print settings fail validation");
        PrintSettingsRepositoryError::query(format!("invalid stored print settings: {err}"))
    })
}

#[async_trait]
impl PrintSettingsRepository for DieselPrintSettingsRepository {
    async fn find(
        &self,
        business_id: &AccountId,
    ) -> Result<Option<PrintSettings>, PrintSettingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = print_settings::table
            .find(business_id.as_uuid())
            .select(PrintSettingsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_settings).transpose()
    }

    async fn save(
        &self,
        business_id: &AccountId,
        settings: &PrintSettings,
    ) -> Result<(), PrintSettingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let record = PrintSettingsRecord {
            business_id: *business_id.as_uuid(),
            printer_type: settings.printer_type.as_str(),
            paper_size: settings.paper_size.as_str(),
            include_timestamp: settings.include_timestamp,
            include_customer_info: settings.include_customer_info,
            include_business_logo: settings.include_business_logo,
            print_copies: i16::from(settings.print_copies()),
            updated_at: Utc::now(),
        };
        diesel::insert_into(print_settings::table)
            .values(&record)
            .on_conflict(print_settings::business_id)
            .do_update()
            .set((
                print_settings::printer_type.eq(excluded(print_settings::printer_type)),
                print_settings::paper_size.eq(excluded(print_settings::paper_size)),
                print_settings::include_timestamp.eq(excluded(print_settings::include_timestamp)),
                print_settings::include_customer_info
                    .eq(excluded(print_settings::include_customer_info)),
                print_settings::include_business_logo
                    .eq(excluded(print_settings::include_business_logo)),
                print_settings::print_copies.eq(excluded(print_settings::print_copies)),
                print_settings::updated_at.eq(excluded(print_settings::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
