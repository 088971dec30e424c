//! Keyword rules for reading employee and manager queries without an LLM.

use crate::domain::model::{ProficiencyLevel, SkillRequirement};

pub const SKILL_KEYWORDS: [&str; 8] = [
    "java", "react", "angular", "python", "sql", "spring", "node", "aws",
];

const ACTION_PHRASES: [&str; 6] = [
    "should",
    "recommend",
    "suggest",
    "consider",
    "next step",
    "action",
];

const MAX_ACTION_ITEMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeIntent {
    FindPositions,
    SkillPositions,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerIntent {
    FindEmployees,
    Help,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

pub fn classify_employee_intent(query: &str) -> EmployeeIntent {
    let query = query.to_lowercase();
    if contains_any(&query, &["open positions", "find jobs", "opportunities"]) {
        EmployeeIntent::FindPositions
    } else if contains_any(&query, &["check position", "specific skills"]) {
        EmployeeIntent::SkillPositions
    } else {
        EmployeeIntent::Help
    }
}

pub fn classify_manager_intent(query: &str) -> ManagerIntent {
    let query = query.to_lowercase();
    if contains_any(
        &query,
        &["find employees", "search resources", "java react angular"],
    ) {
        ManagerIntent::FindEmployees
    } else {
        ManagerIntent::Help
    }
}

/// Substring match, so "javascript" also yields "java".
pub fn extract_skill_keywords(query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    SKILL_KEYWORDS
        .iter()
        .filter(|skill| query.contains(*skill))
        .map(|skill| skill.to_string())
        .collect()
}

pub fn parse_skill_requirements(query: &str) -> Vec<SkillRequirement> {
    let lower = query.to_lowercase();
    let mut requirements = Vec::new();

    if lower.contains("java") {
        requirements.push(SkillRequirement::new("Java", 5.0, ProficiencyLevel::Advanced));
    }
    if lower.contains("react") && query.contains('2') {
        requirements.push(SkillRequirement::new(
            "React",
            2.0,
            ProficiencyLevel::Intermediate,
        ));
    }
    if lower.contains("angular") && query.contains('3') {
        requirements.push(SkillRequirement::new(
            "Angular",
            3.0,
            ProficiencyLevel::Advanced,
        ));
    }
    if lower.contains("sql") {
        requirements.push(SkillRequirement::new(
            "SQL",
            1.0,
            ProficiencyLevel::Intermediate,
        ));
    }

    requirements
}

pub fn extract_action_items(text: &str) -> Vec<String> {
    text.split('.')
        .filter(|sentence| contains_any(&sentence.to_lowercase(), &ACTION_PHRASES))
        .map(|sentence| sentence.trim().to_string())
        .take(MAX_ACTION_ITEMS)
        .collect()
}
