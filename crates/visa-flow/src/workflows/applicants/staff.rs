//! Back-office staff directory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::Applicant;

pub const STAFF_ID_PREFIX: &str = "EMP-";
const FIRST_STAFF_NUMBER: u32 = 1001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Admin,
    Agent,
    Manager,
    Customer,
}

impl StaffRole {
    pub const fn label(self) -> &'static str {
        match self {
            StaffRole::Admin => "ADMIN",
            StaffRole::Agent => "AGENT",
            StaffRole::Manager => "MANAGER",
            StaffRole::Customer => "CUSTOMER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
}

impl StaffStatus {
    pub const fn label(self) -> &'static str {
        match self {
            StaffStatus::Active => "ACTIVE",
            StaffStatus::Inactive => "INACTIVE",
        }
    }
}

/// Back-office user mirrored to the tracker's user list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    pub designation: String,
    pub status: StaffStatus,
    pub joined: NaiveDate,
}

impl StaffMember {
    /// Every new applicant also becomes a customer account.
    pub fn customer_account(applicant: &Applicant, joined: NaiveDate) -> Self {
        Self {
            id: applicant.id.0.clone(),
            name: applicant.full_name(),
            email: applicant.contact.email.clone(),
            role: StaffRole::Customer,
            designation: "Applicant".to_string(),
            status: StaffStatus::Active,
            joined,
        }
    }
}

/// Admin form for a new staff account. The role defaults to agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStaff {
    pub name: String,
    pub email: String,
    pub designation: String,
    #[serde(default)]
    pub role: Option<StaffRole>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffEdits {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub role: Option<StaffRole>,
    #[serde(default)]
    pub status: Option<StaffStatus>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StaffError {
    #[error("staff {0} is required")]
    MissingField(&'static str),
    #[error("customer accounts are created through applicant profiles")]
    CustomerRole,
    #[error("staff member {0} not found")]
    NotFound(String),
}

/// Ordered list of staff accounts with `EMP-` ids.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory {
    members: Vec<StaffMember>,
}

impl StaffDirectory {
    pub fn all(&self) -> &[StaffMember] {
        &self.members
    }

    pub fn get(&self, id: &str) -> Option<&StaffMember> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn next_id(&self) -> String {
        let number = self
            .members
            .iter()
            .filter_map(|member| member.id.strip_prefix(STAFF_ID_PREFIX))
            .filter_map(|digits| digits.parse::<u32>().ok())
            .max()
            .map_or(FIRST_STAFF_NUMBER, |highest| highest + 1);
        format!("{STAFF_ID_PREFIX}{number}")
    }

    pub fn add(&mut self, new: NewStaff, joined: NaiveDate) -> Result<StaffMember, StaffError> {
        let name = required(new.name, "name")?;
        let email = required(new.email, "email")?;
        let designation = required(new.designation, "designation")?;
        let role = new.role.unwrap_or(StaffRole::Agent);
        if role == StaffRole::Customer {
            return Err(StaffError::CustomerRole);
        }

        let member = StaffMember {
            id: self.next_id(),
            name,
            email,
            role,
            designation,
            status: StaffStatus::Active,
            joined,
        };
        self.members.push(member.clone());
        Ok(member)
    }

    pub fn update(&mut self, id: &str, edits: StaffEdits) -> Result<StaffMember, StaffError> {
        let member = self
            .members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or_else(|| StaffError::NotFound(id.to_string()))?;

        if edits.role == Some(StaffRole::Customer) {
            return Err(StaffError::CustomerRole);
        }
        if let Some(name) = edits.name {
            member.name = required(name, "name")?;
        }
        if let Some(email) = edits.email {
            member.email = required(email, "email")?;
        }
        if let Some(designation) = edits.designation {
            member.designation = required(designation, "designation")?;
        }
        if let Some(role) = edits.role {
            member.role = role;
        }
        if let Some(status) = edits.status {
            member.status = status;
        }
        Ok(member.clone())
    }
}

fn required(value: String, field: &'static str) -> Result<String, StaffError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(StaffError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
