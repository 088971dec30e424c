use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::query_parser::{extract_skill_keywords, parse_skill_requirements};
use crate::core::scoring::{
    match_employee_to_requirements, match_employee_to_requisition, CandidateMatch, PositionMatch,
};
use crate::domain::model::{Employee, EmployeeStatus, ProficiencyLevel, SkillRequirement};
use crate::domain::ports::TalentRepository;

/// Tunables for ranking and summarising matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSettings {
    pub max_position_matches: usize,
    pub recommendation_window: usize,
    pub high_match_threshold: f64,
    pub medium_match_threshold: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_position_matches: 5,
            recommendation_window: 3,
            high_match_threshold: 80.0,
            medium_match_threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecommendation {
    pub skill: String,
    pub required_experience: f64,
    pub required_level: ProficiencyLevel,
    pub priority: String,
    pub suggested_training: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSearch {
    pub employee: String,
    pub current_status: EmployeeStatus,
    pub total_matches: usize,
    pub matches: Vec<PositionMatch>,
    pub recommendations: Vec<SkillRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub status: String,
    pub recommendation: String,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapAnalysis {
    pub skill_gaps: Vec<SkillGap>,
    pub total_gaps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillPositionSearch {
    pub employee: String,
    pub searched_skills: Vec<String>,
    pub matching_positions: Vec<PositionMatch>,
    pub skill_gap_analysis: SkillGapAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub total_employees: usize,
    pub high_matches: usize,
    pub medium_matches: usize,
    pub low_matches: usize,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSearch {
    pub search_criteria: Vec<SkillRequirement>,
    pub total_employees_found: usize,
    pub matches: Vec<CandidateMatch>,
    pub summary: SearchSummary,
}

/// A request the engine could not act on, with a hint about what to ask instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clarification {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillSearchOutcome {
    Found(SkillPositionSearch),
    NeedsSkills(Clarification),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateSearchOutcome {
    Found(CandidateSearch),
    NeedsRequirements(Clarification),
}

pub fn training_suggestions(skill: &str) -> Vec<String> {
    let fixed: &[&str] = match skill {
        "Java" => &[
            "Java Certification",
            "Spring Boot Fundamentals",
            "Microservices Architecture",
        ],
        "React" => &[
            "React Advanced Patterns",
            "State Management with Redux",
            "React Testing",
        ],
        "Angular" => &[
            "Angular Framework Deep Dive",
            "RxJS Fundamentals",
            "Angular Performance",
        ],
        "Python" => &[
            "Python for Web Development",
            "Django REST Framework",
            "Python Design Patterns",
        ],
        "SQL" => &[
            "Advanced SQL Queries",
            "Database Optimization",
            "SQL Performance Tuning",
        ],
        _ => {
            return vec![
                format!("{} Fundamentals", skill),
                format!("Advanced {} Concepts", skill),
            ]
        }
    };
    fixed.iter().map(|s| s.to_string()).collect()
}

fn sort_by_score_desc<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

/// Deterministic matching over a talent repository.
#[derive(Clone)]
pub struct MatchEngine {
    repository: Arc<dyn TalentRepository>,
    settings: MatchingSettings,
    reference_date: Option<NaiveDate>,
}

impl MatchEngine {
    pub fn new(repository: Arc<dyn TalentRepository>, settings: MatchingSettings) -> Self {
        Self {
            repository,
            settings,
            reference_date: None,
        }
    }

    /// Pins "today" for availability and bench-day calculations.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn repository(&self) -> &dyn TalentRepository {
        self.repository.as_ref()
    }

    pub fn settings(&self) -> &MatchingSettings {
        &self.settings
    }

    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn find_positions_for_employee(&self, employee: &Employee) -> PositionSearch {
        let today = self.today();
        let mut matches: Vec<PositionMatch> = self
            .repository
            .open_requisitions()
            .into_iter()
            .map(|req| match_employee_to_requisition(employee, req, today))
            .filter(|m| m.total_score > 0.0)
            .collect();
        sort_by_score_desc(&mut matches, |m| m.total_score);

        let total_matches = matches.len();
        let recommendations = self.skill_recommendations(&matches);
        matches.truncate(self.settings.max_position_matches);

        tracing::debug!(
            "🔎 {} matched {} open positions",
            employee.employee_id,
            total_matches
        );

        PositionSearch {
            employee: employee.name.clone(),
            current_status: employee.current_status,
            total_matches,
            matches,
            recommendations,
        }
    }

    /// Mandatory gaps in the best-ranked matches, first occurrence wins.
    pub fn skill_recommendations(&self, matches: &[PositionMatch]) -> Vec<SkillRecommendation> {
        let mut seen = HashSet::new();
        matches
            .iter()
            .take(self.settings.recommendation_window)
            .flat_map(|m| m.missing_skills.iter())
            .filter(|missing| missing.is_mandatory)
            .filter(|missing| seen.insert(missing.skill.clone()))
            .map(|missing| SkillRecommendation {
                skill: missing.skill.clone(),
                required_experience: missing.required_experience,
                required_level: missing.required_level,
                priority: "HIGH".to_string(),
                suggested_training: training_suggestions(&missing.skill),
            })
            .collect()
    }

    pub fn find_positions_with_specific_skills(
        &self,
        employee: &Employee,
        query: &str,
    ) -> SkillSearchOutcome {
        let query_skills = extract_skill_keywords(query);
        if query_skills.is_empty() {
            return SkillSearchOutcome::NeedsSkills(Clarification {
                response: "Please specify which skills you want to check positions for. \
                           For example: 'Check positions for Java and React skills'"
                    .to_string(),
                employee: Some(employee.name.clone()),
            });
        }

        let today = self.today();
        let mut matching_positions: Vec<PositionMatch> = self
            .repository
            .open_requisitions()
            .into_iter()
            .filter(|req| {
                req.required_skills.iter().any(|s| {
                    let name = s.skill_name.to_lowercase();
                    query_skills.iter().any(|q| *q == name)
                })
            })
            .map(|req| match_employee_to_requisition(employee, req, today))
            .collect();
        sort_by_score_desc(&mut matching_positions, |m| m.total_score);

        let skill_gap_analysis = Self::analyze_skill_gaps(employee, &query_skills);

        SkillSearchOutcome::Found(SkillPositionSearch {
            employee: employee.name.clone(),
            searched_skills: query_skills,
            matching_positions,
            skill_gap_analysis,
        })
    }

    pub fn analyze_skill_gaps(employee: &Employee, query_skills: &[String]) -> SkillGapAnalysis {
        let skill_gaps: Vec<SkillGap> = query_skills
            .iter()
            .filter(|skill| employee.skill(skill).is_none())
            .map(|skill| SkillGap {
                skill: skill.clone(),
                status: "MISSING".to_string(),
                recommendation: format!("Consider learning {} to expand opportunities", skill),
                priority: "MEDIUM".to_string(),
            })
            .collect();

        SkillGapAnalysis {
            total_gaps: skill_gaps.len(),
            skill_gaps,
        }
    }

    pub fn find_employees_by_skills(&self, query: &str) -> CandidateSearchOutcome {
        let requirements = parse_skill_requirements(query);
        if requirements.is_empty() {
            return CandidateSearchOutcome::NeedsRequirements(Clarification {
                response: "Please specify skill requirements. Example: 'Find employees with \
                           Java 5+ years, React 2+ years, Angular 3+ years'"
                    .to_string(),
                employee: None,
            });
        }
        CandidateSearchOutcome::Found(self.find_employees_for_requirements(requirements))
    }

    pub fn find_employees_for_requirements(
        &self,
        requirements: Vec<SkillRequirement>,
    ) -> CandidateSearch {
        let today = self.today();
        let mut matches: Vec<CandidateMatch> = self
            .repository
            .available_employees()
            .into_iter()
            .map(|emp| match_employee_to_requirements(emp, &requirements, today))
            .filter(|m| m.total_score > 0.0)
            .collect();
        sort_by_score_desc(&mut matches, |m| m.total_score);

        let summary = self.search_summary(&matches);
        tracing::debug!(
            "🔎 Staffing search over {} requirements found {} candidates",
            requirements.len(),
            matches.len()
        );

        CandidateSearch {
            search_criteria: requirements,
            total_employees_found: matches.len(),
            matches,
            summary,
        }
    }

    pub fn search_summary(&self, matches: &[CandidateMatch]) -> SearchSummary {
        let (high, medium) = self.count_tiers(matches);
        SearchSummary {
            total_employees: matches.len(),
            high_matches: high,
            medium_matches: medium,
            low_matches: matches.len() - high - medium,
            recommendation: self.staffing_recommendation(matches),
        }
    }

    fn count_tiers(&self, matches: &[CandidateMatch]) -> (usize, usize) {
        let high = matches
            .iter()
            .filter(|m| m.total_score >= self.settings.high_match_threshold)
            .count();
        let medium = matches
            .iter()
            .filter(|m| {
                m.total_score >= self.settings.medium_match_threshold
                    && m.total_score < self.settings.high_match_threshold
            })
            .count();
        (high, medium)
    }

    pub fn staffing_recommendation(&self, matches: &[CandidateMatch]) -> String {
        if matches.is_empty() {
            return "No suitable internal candidates found. Consider external hiring.".to_string();
        }

        let (high, medium) = self.count_tiers(matches);
        if high > 0 {
            format!(
                "Found {} excellent matches. Recommend proceeding with internal hiring.",
                high
            )
        } else if medium > 0 {
            format!(
                "Found {} potential matches with some skill gaps. Consider training or external backup.",
                medium
            )
        } else {
            "Limited internal matches. Strongly recommend external hiring with internal backup plan."
                .to_string()
        }
    }
}
