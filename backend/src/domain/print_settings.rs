//! Receipt printing preferences for a business account.

use serde::{Deserialize, Serialize};

pub const MIN_PRINT_COPIES: u8 = 1;
pub const MAX_PRINT_COPIES: u8 = 3;

/// Rejected print settings input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrintSettingsError {
    #[error("unknown printer type: {value}")]
    UnknownPrinterType { value: String },
    #[error("unknown paper size: {value}")]
    UnknownPaperSize { value: String },
    #[error("print copies must be between {min} and {max}")]
    CopiesOutOfRange { min: u8, max: u8 },
}

impl PrintSettingsError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnknownPrinterType { .. } => "printerType",
            Self::UnknownPaperSize { .. } => "paperSize",
            Self::CopiesOutOfRange { .. } => "printCopies",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownPrinterType { .. } => "unknown_printer_type",
            Self::UnknownPaperSize { .. } => "unknown_paper_size",
            Self::CopiesOutOfRange { .. } => "copies_out_of_range",
        }
    }
}

/// Kind of printer attached to the order station.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PrinterType {
    #[default]
    Thermal,
    Inkjet,
    Laser,
}

impl PrinterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thermal => "thermal",
            Self::Inkjet => "inkjet",
            Self::Laser => "laser",
        }
    }
}

impl std::str::FromStr for PrinterType {
    type Err = PrintSettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thermal" => Ok(Self::Thermal),
            "inkjet" => Ok(Self::Inkjet),
            "laser" => Ok(Self::Laser),
            _ => Err(PrintSettingsError::UnknownPrinterType {
                value: s.to_owned(),
            }),
        }
    }
}

/// Receipt paper width or sheet format.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum PaperSize {
    #[default]
    #[serde(rename = "80mm")]
    Roll80,
    #[serde(rename = "58mm")]
    Roll58,
    #[serde(rename = "a4")]
    A4,
}

impl PaperSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roll80 => "80mm",
            Self::Roll58 => "58mm",
            Self::A4 => "a4",
        }
    }
}

impl std::str::FromStr for PaperSize {
    type Err = PrintSettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "80mm" => Ok(Self::Roll80),
            "58mm" => Ok(Self::Roll58),
            "a4" => Ok(Self::A4),
            _ => Err(PrintSettingsError::UnknownPaperSize {
                value: s.to_owned(),
            }),
        }
    }
}

/// Stored print settings. Accounts without a stored row use [`Default`].
///
/// # Examples
/// ```
/// use voice_orders::domain::{PaperSize, PrintSettings, PrinterType};
///
/// let defaults = PrintSettings::default();
/// assert_eq!(defaults.printer_type, PrinterType::Thermal);
/// assert_eq!(defaults.paper_size, PaperSize::Roll80);
/// assert_eq!(defaults.print_copies(), 1);
/// assert!(!defaults.include_business_logo);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintSettings {
    pub printer_type: PrinterType,
    pub paper_size: PaperSize,
    pub include_timestamp: bool,
    pub include_customer_info: bool,
    pub include_business_logo: bool,
    print_copies: u8,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            printer_type: PrinterType::default(),
            paper_size: PaperSize::default(),
            include_timestamp: true,
            include_customer_info: true,
            include_business_logo: false,
            print_copies: MIN_PRINT_COPIES,
        }
    }
}

impl PrintSettings {
    pub fn new(
        printer_type: PrinterType,
        paper_size: PaperSize,
        include_timestamp: bool,
        include_customer_info: bool,
        include_business_logo: bool,
        print_copies: u8,
    ) -> Result<Self, PrintSettingsError> {
        if !(MIN_PRINT_COPIES..=MAX_PRINT_COPIES).contains(&print_copies) {
            return Err(PrintSettingsError::CopiesOutOfRange {
                min: MIN_PRINT_COPIES,
                max: MAX_PRINT_COPIES,
            });
        }
        Ok(Self {
            printer_type,
            paper_size,
            include_timestamp,
            include_customer_info,
            include_business_logo,
            print_copies,
        })
    }

    pub fn print_copies(&self) -> u8 {
        self.print_copies
    }
}

/// Raw update as submitted by the settings form; omitted fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintSettingsPatch {
    pub printer_type: Option<String>,
    pub paper_size: Option<String>,
    pub include_timestamp: Option<bool>,
    pub include_customer_info: Option<bool>,
    pub include_business_logo: Option<bool>,
    pub print_copies: Option<i64>,
    pub auto_print: Option<bool>,
}

impl PrintSettingsPatch {
    /// Apply the patch over `current`, validating every provided field.
    pub fn apply(&self, current: PrintSettings) -> Result<PrintSettings, PrintSettingsError> {
        let printer_type = self
            .printer_type
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or(current.printer_type);
        let paper_size = self
            .paper_size
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or(current.paper_size);
        let print_copies = match self.print_copies {
            Some(raw) => u8::try_from(raw).map_err(|_| PrintSettingsError::CopiesOutOfRange {
                min: MIN_PRINT_COPIES,
                max: MAX_PRINT_COPIES,
            })?,
            None => current.print_copies,
        };
        PrintSettings::new(
            printer_type,
            paper_size,
            self.include_timestamp.unwrap_or(current.include_timestamp),
            self.include_customer_info
                .unwrap_or(current.include_customer_info),
            self.include_business_logo
                .unwrap_or(current.include_business_logo),
            print_copies,
        )
    }
}

/// Settings page payload: stored settings plus the account's auto-print flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintSettingsView {
    #[serde(flatten)]
    pub settings: PrintSettings,
    pub auto_print: bool,
}
