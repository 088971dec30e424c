use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::utils::error::{Result, TalentError};
use crate::utils::validation::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Bench,
    Transitioning,
    Active,
    NoticePeriod,
}

impl EmployeeStatus {
    /// Bench, transitioning and notice-period employees can be staffed.
    pub fn is_available(self) -> bool {
        matches!(
            self,
            EmployeeStatus::Bench | EmployeeStatus::Transitioning | EmployeeStatus::NoticePeriod
        )
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmployeeStatus::Bench => "BENCH",
            EmployeeStatus::Transitioning => "TRANSITIONING",
            EmployeeStatus::Active => "ACTIVE",
            EmployeeStatus::NoticePeriod => "NOTICE_PERIOD",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequisitionStatus {
    Open,
    OnHold,
    Filled,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HiringType {
    Internal,
    External,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSkill {
    pub skill_name: String,
    pub category: String,
    pub experience_years: f64,
    pub proficiency_level: ProficiencyLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub current_status: EmployeeStatus,
    pub current_project: Option<String>,
    pub project_end_date: Option<NaiveDate>,
    pub bench_start_date: Option<NaiveDate>,
    pub skills: Vec<EmployeeSkill>,
    pub performance_rating: f64,
    pub location: String,
}

impl Employee {
    /// Case-insensitive skill lookup.
    pub fn skill(&self, name: &str) -> Option<&EmployeeSkill> {
        self.skills
            .iter()
            .find(|s| s.skill_name.eq_ignore_ascii_case(name))
    }
}

fn default_min_experience() -> f64 {
    1.0
}

/// A free-form skill requirement, as asked for by a manager or parsed from a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill_name: String,
    #[serde(default = "default_min_experience")]
    pub min_experience: f64,
    #[serde(default)]
    pub required_level: ProficiencyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl SkillRequirement {
    pub fn new(skill_name: &str, min_experience: f64, required_level: ProficiencyLevel) -> Self {
        Self {
            skill_name: skill_name.to_string(),
            min_experience,
            required_level,
            priority: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredSkill {
    pub skill_name: String,
    pub min_experience: f64,
    pub required_level: ProficiencyLevel,
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requisition {
    pub requisition_id: String,
    pub project_name: String,
    pub role_title: String,
    pub status: RequisitionStatus,
    pub start_date: NaiveDate,
    pub required_skills: Vec<RequiredSkill>,
    pub location: String,
    pub experience_level: String,
    pub hiring_type: HiringType,
}

impl Requisition {
    pub fn is_open(&self) -> bool {
        self.status == RequisitionStatus::Open
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyEntry {
    pub category: String,
    pub related_skills: Vec<String>,
}

pub type SkillOntology = BTreeMap<String, OntologyEntry>;

/// Everything the service knows about people, positions and skills.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub employees: Vec<Employee>,
    pub requisitions: Vec<Requisition>,
    #[serde(default)]
    pub skill_ontology: SkillOntology,
}

impl Dataset {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(content)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }
}

impl Validate for Dataset {
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for employee in &self.employees {
            if !seen.insert(employee.employee_id.as_str()) {
                return Err(TalentError::ValidationError {
                    message: format!("Duplicate employee id: {}", employee.employee_id),
                });
            }
        }

        let mut seen = HashSet::new();
        for requisition in &self.requisitions {
            if !seen.insert(requisition.requisition_id.as_str()) {
                return Err(TalentError::ValidationError {
                    message: format!("Duplicate requisition id: {}", requisition.requisition_id),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_proficiency_deserializes_to_unknown() {
        let req: SkillRequirement =
            serde_json::from_str(r#"{"skill_name": "Go", "required_level": "GURU"}"#).unwrap();
        assert_eq!(req.required_level, ProficiencyLevel::Unknown);
        assert_eq!(req.min_experience, 1.0);
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&EmployeeStatus::NoticePeriod).unwrap();
        assert_eq!(json, "\"NOTICE_PERIOD\"");
        assert!(EmployeeStatus::NoticePeriod.is_available());
        assert!(!EmployeeStatus::Active.is_available());
    }

    #[test]
    fn test_duplicate_employee_ids_fail_validation() {
        let content = r#"{
            "employees": [
                {"employee_id": "E1", "name": "A", "email": "a@example.com",
                 "current_status": "BENCH", "current_project": null,
                 "project_end_date": null, "bench_start_date": "2024-01-01",
                 "skills": [], "performance_rating": 4.0, "location": "Pune"},
                {"employee_id": "E1", "name": "B", "email": "b@example.com",
                 "current_status": "ACTIVE", "current_project": "X",
                 "project_end_date": "2024-09-01", "bench_start_date": null,
                 "skills": [], "performance_rating": 3.0, "location": "Pune"}
            ],
            "requisitions": []
        }"#;

        let err = Dataset::from_json_str(content).unwrap_err();
        assert!(err.to_string().contains("Duplicate employee id: E1"));
    }

    #[test]
    fn test_duplicate_requisition_ids_fail_validation() {
        let content = r#"{
            "employees": [],
            "requisitions": [
                {"requisition_id": "REQ1", "project_name": "Atlas", "role_title": "Backend",
                 "status": "OPEN", "start_date": "2024-07-01", "required_skills": [],
                 "location": "Pune", "experience_level": "Senior", "hiring_type": "INTERNAL"},
                {"requisition_id": "REQ1", "project_name": "Borealis", "role_title": "Frontend",
                 "status": "ON_HOLD", "start_date": "2024-08-01", "required_skills": [],
                 "location": "Remote", "experience_level": "Mid", "hiring_type": "BOTH"}
            ]
        }"#;

        let err = Dataset::from_json_str(content).unwrap_err();
        assert!(matches!(err, TalentError::ValidationError { .. }));
        assert!(err.to_string().contains("Duplicate requisition id: REQ1"));
    }

    #[test]
    fn test_skill_lookup_is_case_insensitive() {
        let employee = Employee {
            employee_id: "E1".to_string(),
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            current_status: EmployeeStatus::Bench,
            current_project: None,
            project_end_date: None,
            bench_start_date: None,
            skills: vec![EmployeeSkill {
                skill_name: "Spring Boot".to_string(),
                category: "Backend".to_string(),
                experience_years: 3.0,
                proficiency_level: ProficiencyLevel::Advanced,
            }],
            performance_rating: 4.0,
            location: "Pune".to_string(),
        };

        assert!(employee.skill("spring boot").is_some());
        assert!(employee.skill("spring").is_none());
    }
}
