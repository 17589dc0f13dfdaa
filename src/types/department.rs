use super::DepartmentId;
use serde::{Deserialize, Serialize};

/// An academic department. Codes are short uppercase tags (e.g. "AEN")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub code: String,
}
