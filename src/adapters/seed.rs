//! Demo dataset bundled with the binary, used when no dataset file is configured.

use chrono::NaiveDate;

use crate::domain::model::{
    Dataset, Employee, EmployeeSkill, EmployeeStatus, HiringType, OntologyEntry, ProficiencyLevel,
    RequiredSkill, Requisition, RequisitionStatus, SkillOntology,
};

use ProficiencyLevel::{Advanced, Beginner, Expert, Intermediate};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn skill(name: &str, category: &str, years: f64, level: ProficiencyLevel) -> EmployeeSkill {
    EmployeeSkill {
        skill_name: name.to_string(),
        category: category.to_string(),
        experience_years: years,
        proficiency_level: level,
    }
}

fn required(name: &str, years: f64, level: ProficiencyLevel, mandatory: bool) -> RequiredSkill {
    RequiredSkill {
        skill_name: name.to_string(),
        min_experience: years,
        required_level: level,
        is_mandatory: mandatory,
    }
}

#[allow(clippy::too_many_arguments)]
fn employee(
    id: &str,
    name: &str,
    email: &str,
    status: EmployeeStatus,
    project: Option<&str>,
    project_end_date: Option<NaiveDate>,
    bench_start_date: Option<NaiveDate>,
    skills: Vec<EmployeeSkill>,
    rating: f64,
    location: &str,
) -> Employee {
    Employee {
        employee_id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        current_status: status,
        current_project: project.map(str::to_string),
        project_end_date,
        bench_start_date,
        skills,
        performance_rating: rating,
        location: location.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn requisition(
    id: &str,
    project: &str,
    role: &str,
    start_date: NaiveDate,
    required_skills: Vec<RequiredSkill>,
    location: &str,
    experience_level: &str,
    hiring_type: HiringType,
) -> Requisition {
    Requisition {
        requisition_id: id.to_string(),
        project_name: project.to_string(),
        role_title: role.to_string(),
        status: RequisitionStatus::Open,
        start_date,
        required_skills,
        location: location.to_string(),
        experience_level: experience_level.to_string(),
        hiring_type,
    }
}

pub fn builtin_employees() -> Vec<Employee> {
    vec![
        employee(
            "EMP001",
            "Raj Sharma",
            "raj.sharma@example.com",
            EmployeeStatus::Bench,
            None,
            None,
            date(2024, 4, 15),
            vec![
                skill("Java", "Backend", 6.0, Expert),
                skill("Spring Boot", "Backend", 5.0, Advanced),
                skill("React", "Frontend", 2.0, Intermediate),
                skill("SQL", "Database", 4.0, Advanced),
                skill("Angular", "Frontend", 1.0, Beginner),
            ],
            4.2,
            "Pune",
        ),
        employee(
            "EMP002",
            "Priya Patel",
            "priya.patel@example.com",
            EmployeeStatus::Transitioning,
            Some("Project Phoenix"),
            date(2024, 6, 30),
            None,
            vec![
                skill("Java", "Backend", 7.0, Expert),
                skill("React", "Frontend", 3.0, Advanced),
                skill("Angular", "Frontend", 4.0, Advanced),
                skill("Node.js", "Backend", 2.0, Intermediate),
                skill("MongoDB", "Database", 3.0, Advanced),
            ],
            4.5,
            "Bangalore",
        ),
        employee(
            "EMP003",
            "Amit Kumar",
            "amit.kumar@example.com",
            EmployeeStatus::Active,
            Some("Project Alpha"),
            date(2024, 8, 15),
            None,
            vec![
                skill("Python", "Backend", 5.0, Advanced),
                skill("Django", "Backend", 4.0, Advanced),
                skill("React", "Frontend", 2.0, Intermediate),
                skill("PostgreSQL", "Database", 4.0, Advanced),
            ],
            4.0,
            "Hyderabad",
        ),
        employee(
            "EMP004",
            "Sneha Desai",
            "sneha.desai@example.com",
            EmployeeStatus::Bench,
            None,
            None,
            date(2024, 5, 1),
            vec![
                skill("Java", "Backend", 8.0, Expert),
                skill("Spring Boot", "Backend", 6.0, Expert),
                skill("Angular", "Frontend", 5.0, Advanced),
                skill("SQL", "Database", 6.0, Expert),
                skill("AWS", "Cloud", 3.0, Intermediate),
            ],
            4.7,
            "Pune",
        ),
        employee(
            "EMP005",
            "Varun Singh",
            "varun.singh@example.com",
            EmployeeStatus::NoticePeriod,
            Some("Project Beta"),
            date(2024, 6, 15),
            None,
            vec![
                skill("React", "Frontend", 4.0, Advanced),
                skill("JavaScript", "Frontend", 5.0, Advanced),
                skill("Node.js", "Backend", 3.0, Intermediate),
                skill("Java", "Backend", 2.0, Intermediate),
            ],
            3.8,
            "Chennai",
        ),
    ]
}

pub fn builtin_requisitions() -> Vec<Requisition> {
    let start = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    vec![
        requisition(
            "REQ001",
            "Digital Banking Platform",
            "Full Stack Developer",
            start(2024, 6, 1),
            vec![
                required("Java", 5.0, Advanced, true),
                required("Spring Boot", 3.0, Advanced, true),
                required("React", 2.0, Intermediate, true),
                required("SQL", 3.0, Advanced, false),
            ],
            "Pune",
            "Senior",
            HiringType::Internal,
        ),
        requisition(
            "REQ002",
            "E-commerce Modernization",
            "Frontend Lead",
            start(2024, 6, 15),
            vec![
                required("React", 4.0, Advanced, true),
                required("Angular", 3.0, Advanced, true),
                required("JavaScript", 5.0, Expert, true),
                required("TypeScript", 2.0, Intermediate, false),
            ],
            "Bangalore",
            "Lead",
            HiringType::Both,
        ),
        requisition(
            "REQ003",
            "Healthcare Analytics",
            "Backend Developer",
            start(2024, 7, 1),
            vec![
                required("Python", 4.0, Advanced, true),
                required("Django", 3.0, Advanced, true),
                required("PostgreSQL", 3.0, Advanced, true),
                required("AWS", 2.0, Intermediate, false),
            ],
            "Hyderabad",
            "Mid-Senior",
            HiringType::Internal,
        ),
        requisition(
            "REQ004",
            "Insurance Portal",
            "Java Full Stack Developer",
            start(2024, 6, 10),
            vec![
                required("Java", 6.0, Expert, true),
                required("Spring Boot", 4.0, Advanced, true),
                required("Angular", 3.0, Advanced, true),
                required("SQL", 4.0, Advanced, true),
                required("React", 2.0, Intermediate, false),
            ],
            "Pune",
            "Senior",
            HiringType::Internal,
        ),
    ]
}

pub fn builtin_skill_ontology() -> SkillOntology {
    let entries: [(&str, &str, &[&str]); 6] = [
        ("Java", "Backend", &["Spring Boot", "J2EE", "Microservices"]),
        ("Spring Boot", "Backend", &["Java", "Microservices", "REST API"]),
        ("React", "Frontend", &["JavaScript", "TypeScript", "Redux"]),
        ("Angular", "Frontend", &["TypeScript", "JavaScript", "RxJS"]),
        ("Python", "Backend", &["Django", "Flask", "FastAPI"]),
        ("SQL", "Database", &["Database Design", "Query Optimization"]),
    ];

    entries
        .into_iter()
        .map(|(skill, category, related)| {
            (
                skill.to_string(),
                OntologyEntry {
                    category: category.to_string(),
                    related_skills: related.iter().map(|s| s.to_string()).collect(),
                },
            )
        })
        .collect()
}

pub fn builtin_dataset() -> Dataset {
    Dataset {
        employees: builtin_employees(),
        requisitions: builtin_requisitions(),
        skill_ontology: builtin_skill_ontology(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    #[test]
    fn test_builtin_dataset_is_valid() {
        let dataset = builtin_dataset();
        assert_eq!(dataset.employees.len(), 5);
        assert_eq!(dataset.requisitions.len(), 4);
        assert!(dataset.requisitions.iter().all(|r| r.is_open()));
        assert_eq!(dataset.skill_ontology.len(), 6);
        assert!(dataset.validate().is_ok());
    }

    #[test]
    fn test_builtin_dataset_survives_json_round_trip() {
        let json = serde_json::to_string(&builtin_dataset()).unwrap();
        let reloaded = Dataset::from_json_str(&json).unwrap();
        assert_eq!(reloaded.employees[3].name, "Sneha Desai");
        assert_eq!(
            reloaded.employees[0].bench_start_date,
            NaiveDate::from_ymd_opt(2024, 4, 15)
        );
    }
}
