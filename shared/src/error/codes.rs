//! Unified error codes for the catalog service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 6xxx: Catalog errors (products, categories, subcategories, attributes, uploads)
//! - 7xxx: Order errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on a
/// number instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product price is invalid
    ProductInvalidPrice = 6002,
    /// Product stock is invalid
    ProductInvalidStock = 6003,
    /// Product condition label is not recognized
    ProductInvalidCondition = 6004,
    /// Category not found
    CategoryNotFound = 6101,
    /// Subcategory not found
    SubcategoryNotFound = 6201,
    /// Attribute not found
    AttributeNotFound = 6301,
    /// Extra attribute key has no definition in scope
    AttributeUnknownKey = 6302,
    /// Filter payload is malformed
    FilterInvalid = 6401,
    /// Price bound is not a number
    PriceBoundInvalid = 6402,
    /// Neither a category nor a subcategory was supplied
    ScopeRequired = 6403,

    // File Upload
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file
    EmptyFile = 6505,
    /// File name is missing or unsafe
    InvalidFilename = 6506,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 7xxx: Order ====================
    /// Order payload is incomplete
    OrderInvalid = 7001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            // Auth
            Self::NotAuthenticated => "Not authenticated",
            Self::InvalidCredentials => "Invalid credentials",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",

            // Catalog
            Self::ProductNotFound => "Product not found",
            Self::ProductInvalidPrice => "Invalid product price",
            Self::ProductInvalidStock => "Invalid product stock",
            Self::ProductInvalidCondition => "Invalid product condition",
            Self::CategoryNotFound => "Category not found",
            Self::SubcategoryNotFound => "Subcategory not found",
            Self::AttributeNotFound => "Attribute not found",
            Self::AttributeUnknownKey => "Unknown attribute",
            Self::FilterInvalid => "Invalid filters",
            Self::PriceBoundInvalid => "Invalid price bound",
            Self::ScopeRequired => "category_id or subcategory_id is required",

            // Upload
            Self::FileTooLarge => "File too large",
            Self::UnsupportedFileFormat => "Unsupported file format",
            Self::InvalidImageFile => "Invalid image file",
            Self::NoFileProvided => "No file provided",
            Self::EmptyFile => "Empty file",
            Self::InvalidFilename => "Invalid filename",
            Self::ImageProcessingFailed => "Image processing failed",
            Self::FileStorageFailed => "File storage failed",

            // Order
            Self::OrderInvalid => "Invalid order",

            // System
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::NetworkError => "Network error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductInvalidStock),
            6004 => Ok(ErrorCode::ProductInvalidCondition),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6201 => Ok(ErrorCode::SubcategoryNotFound),
            6301 => Ok(ErrorCode::AttributeNotFound),
            6302 => Ok(ErrorCode::AttributeUnknownKey),
            6401 => Ok(ErrorCode::FilterInvalid),
            6402 => Ok(ErrorCode::PriceBoundInvalid),
            6403 => Ok(ErrorCode::ScopeRequired),

            // Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::InvalidFilename),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // Order
            7001 => Ok(ErrorCode::OrderInvalid),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::CategoryNotFound.code(), 6101);
        assert_eq!(ErrorCode::SubcategoryNotFound.code(), 6201);
        assert_eq!(ErrorCode::AttributeUnknownKey.code(), 6302);
        assert_eq!(ErrorCode::PriceBoundInvalid.code(), 6402);
        assert_eq!(ErrorCode::NoFileProvided.code(), 6504);
        assert_eq!(ErrorCode::OrderInvalid.code(), 7001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(6201), Ok(ErrorCode::SubcategoryNotFound));
        assert_eq!(ErrorCode::try_from(6401), Ok(ErrorCode::FilterInvalid));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::DatabaseError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(ErrorCode::try_from(6507), Err(InvalidErrorCode(6507)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::CategoryNotFound).unwrap();
        assert_eq!(json, "6101");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("6302").unwrap();
        assert_eq!(code, ErrorCode::AttributeUnknownKey);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::SubcategoryNotFound.message(), "Subcategory not found");
        assert_eq!(ErrorCode::InvalidCredentials.message(), "Invalid credentials");
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::ProductNotFound.to_string(), "6001");
        assert_eq!(InvalidErrorCode(77).to_string(), "Invalid error code: 77");
    }
}
