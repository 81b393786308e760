/*!
 * Memory Types
 * Admission policies and accounting types for the memory allocator
 */

use crate::core::types::Size;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Accounting granularity under the paged policy, in memory units
pub const PAGE_SIZE: Size = 100;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone)]
pub enum MemoryError {
    #[error(
        "Policy change denied: {used} units still reserved ({reservations} paged reservations)"
    )]
    PolicyChangeDenied { used: Size, reservations: usize },
}

/// Admission policy configuration
///
/// Paged rounds every footprint up to whole pages; Compacted bills the raw
/// footprint with no rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionPolicy {
    /// Page-granular accounting with fixed-size pages
    Paged,
    /// Byte-exact accounting (compaction keeps free space contiguous)
    Compacted,
}

impl AdmissionPolicy {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "paged" | "paging" => Ok(Self::Paged),
            "compacted" | "compaction" => Ok(Self::Compacted),
            _ => Err(format!("Invalid policy '{}'. Valid: paged, compacted", s)),
        }
    }

    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paged => "paged",
            Self::Compacted => "compacted",
        }
    }
}

impl Serialize for AdmissionPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AdmissionPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Memory accounting snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemoryStatus {
    pub total: Size,
    pub used: Size,
    pub free: Size,
    /// Pages in use; present only under the paged policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Size>,
}

impl MemoryStatus {
    /// Fraction of capacity in use, for display
    #[inline]
    #[must_use]
    pub fn usage_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.used as f64 / self.total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            AdmissionPolicy::from_str("paged").unwrap(),
            AdmissionPolicy::Paged
        );
        assert_eq!(
            AdmissionPolicy::from_str("Compacted").unwrap(),
            AdmissionPolicy::Compacted
        );
        assert!(AdmissionPolicy::from_str("invalid").is_err());
    }

    #[test]
    fn test_policy_serde_round_trip() {
        let json = serde_json::to_string(&AdmissionPolicy::Paged).unwrap();
        assert_eq!(json, "\"paged\"");
        let back: AdmissionPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AdmissionPolicy::Paged);
    }

    #[test]
    fn test_status_omits_pages_when_absent() {
        let status = MemoryStatus {
            total: 1000,
            used: 300,
            free: 700,
            pages: None,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("pages"));
        assert!((status.usage_percentage() - 30.0).abs() < f64::EPSILON);
    }
}
