//! Skill and availability scoring shared by position and candidate searches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::model::{
    Employee, EmployeeSkill, EmployeeStatus, ProficiencyLevel, Requisition, SkillRequirement,
};

const MAX_EXPERIENCE_RATIO: f64 = 2.0;
const EXPERIENCE_POINTS_PER_RATIO: f64 = 35.0;
const MAX_EXPERIENCE_POINTS: f64 = 70.0;
const UNKNOWN_REQUIRED_LEVEL_POINTS: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    ImmediatelyAvailable,
    AvailableSoon,
    NotAvailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub status: AvailabilityStatus,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSkill {
    pub skill: String,
    pub required_experience: f64,
    pub employee_experience: f64,
    pub match_score: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSkill {
    pub skill: String,
    pub required_experience: f64,
    pub required_level: ProficiencyLevel,
    pub is_mandatory: bool,
}

/// How well one employee fits one requisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionMatch {
    pub requisition_id: String,
    pub project_name: String,
    pub role_title: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub total_score: f64,
    pub skill_matches: Vec<MatchedSkill>,
    pub missing_skills: Vec<MissingSkill>,
    pub availability_status: Availability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSkill {
    pub skill: String,
    pub required_experience: f64,
    pub employee_experience: f64,
    pub employee_level: ProficiencyLevel,
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGap {
    pub skill: String,
    pub required_experience: f64,
    pub required_level: ProficiencyLevel,
}

/// How well one employee fits a set of free-form requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub employee_id: String,
    pub employee_name: String,
    pub current_status: EmployeeStatus,
    pub location: String,
    pub performance_rating: f64,
    pub total_score: f64,
    pub matched_skills: Vec<CandidateSkill>,
    pub missing_skills: Vec<CandidateGap>,
    pub bench_days: i64,
}

fn level_points(level: ProficiencyLevel) -> Option<f64> {
    match level {
        ProficiencyLevel::Beginner => Some(10.0),
        ProficiencyLevel::Intermediate => Some(20.0),
        ProficiencyLevel::Advanced | ProficiencyLevel::Expert => Some(30.0),
        ProficiencyLevel::Unknown => None,
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score in `[0, 1]`: up to 70 points for experience (capped at twice the
/// requirement) plus up to 30 for proficiency, capped at the required level.
pub fn skill_match_score(
    skill: &EmployeeSkill,
    min_experience: f64,
    required_level: ProficiencyLevel,
) -> f64 {
    let ratio = if min_experience <= 0.0 {
        MAX_EXPERIENCE_RATIO
    } else {
        (skill.experience_years / min_experience).min(MAX_EXPERIENCE_RATIO)
    };
    let experience_points = (ratio * EXPERIENCE_POINTS_PER_RATIO).min(MAX_EXPERIENCE_POINTS);

    let employee_points = level_points(skill.proficiency_level).unwrap_or(0.0);
    let required_points = level_points(required_level).unwrap_or(UNKNOWN_REQUIRED_LEVEL_POINTS);

    (experience_points + employee_points.min(required_points)) / 100.0
}

pub fn bench_days(employee: &Employee, today: NaiveDate) -> i64 {
    employee
        .bench_start_date
        .map(|start| (today - start).num_days())
        .unwrap_or(0)
}

pub fn check_availability(employee: &Employee, today: NaiveDate) -> Availability {
    match employee.current_status {
        EmployeeStatus::Bench => Availability {
            status: AvailabilityStatus::ImmediatelyAvailable,
            details: "On bench".to_string(),
        },
        EmployeeStatus::NoticePeriod => Availability {
            status: AvailabilityStatus::AvailableSoon,
            details: match employee.project_end_date {
                Some(end) => format!("Notice period ends {}", end),
                None => "Notice period end date not set".to_string(),
            },
        },
        EmployeeStatus::Transitioning => Availability {
            status: AvailabilityStatus::AvailableSoon,
            details: match employee.project_end_date {
                Some(end) => format!("Available in {} days", (end - today).num_days()),
                None => "End date not set".to_string(),
            },
        },
        EmployeeStatus::Active => Availability {
            status: AvailabilityStatus::NotAvailable,
            details: "Currently on active project".to_string(),
        },
    }
}

/// Mandatory skills weigh twice as much as optional ones.
pub fn match_employee_to_requisition(
    employee: &Employee,
    requisition: &Requisition,
    today: NaiveDate,
) -> PositionMatch {
    let mut total = 0.0;
    let mut max_score = 0.0;
    let mut skill_matches = Vec::new();
    let mut missing_skills = Vec::new();

    for required in &requisition.required_skills {
        let weight = if required.is_mandatory { 2.0 } else { 1.0 };
        max_score += weight;

        match employee.skill(&required.skill_name) {
            Some(skill) => {
                let score =
                    skill_match_score(skill, required.min_experience, required.required_level);
                skill_matches.push(MatchedSkill {
                    skill: required.skill_name.clone(),
                    required_experience: required.min_experience,
                    employee_experience: skill.experience_years,
                    match_score: score,
                    status: "MATCHED".to_string(),
                });
                total += score * weight;
            }
            None => missing_skills.push(MissingSkill {
                skill: required.skill_name.clone(),
                required_experience: required.min_experience,
                required_level: required.required_level,
                is_mandatory: required.is_mandatory,
            }),
        }
    }

    let normalized = if max_score > 0.0 {
        total / max_score * 100.0
    } else {
        0.0
    };

    PositionMatch {
        requisition_id: requisition.requisition_id.clone(),
        project_name: requisition.project_name.clone(),
        role_title: requisition.role_title.clone(),
        location: requisition.location.clone(),
        start_date: requisition.start_date,
        total_score: round2(normalized),
        skill_matches,
        missing_skills,
        availability_status: check_availability(employee, today),
    }
}

pub fn match_employee_to_requirements(
    employee: &Employee,
    requirements: &[SkillRequirement],
    today: NaiveDate,
) -> CandidateMatch {
    let mut total = 0.0;
    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();

    for requirement in requirements {
        match employee.skill(&requirement.skill_name) {
            Some(skill) => {
                let score = skill_match_score(
                    skill,
                    requirement.min_experience,
                    requirement.required_level,
                );
                matched_skills.push(CandidateSkill {
                    skill: requirement.skill_name.clone(),
                    required_experience: requirement.min_experience,
                    employee_experience: skill.experience_years,
                    employee_level: skill.proficiency_level,
                    match_score: score,
                });
                total += score;
            }
            None => missing_skills.push(CandidateGap {
                skill: requirement.skill_name.clone(),
                required_experience: requirement.min_experience,
                required_level: requirement.required_level,
            }),
        }
    }

    let normalized = if requirements.is_empty() {
        0.0
    } else {
        total / requirements.len() as f64 * 100.0
    };

    CandidateMatch {
        employee_id: employee.employee_id.clone(),
        employee_name: employee.name.clone(),
        current_status: employee.current_status,
        location: employee.location.clone(),
        performance_rating: employee.performance_rating,
        total_score: round2(normalized),
        matched_skills,
        missing_skills,
        bench_days: bench_days(employee, today),
    }
}
