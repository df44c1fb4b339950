//! Structural validation for the five application sections.
//!
//! Validation walks a section top-down and stops at the first violation. Optional
//! fields are only checked when present; a blank string counts as absent.

use super::domain::{
    Address, ApplicationDocument, Documents, Education, EducationEntry, Experience, PersonalInfo,
    Reference, References, SectionRecord, Supervisor, WorkExperience,
};
use super::rules::{
    check_gpa, FieldRule, ValidationFailure, COMPANY, DATE, DEGREE, EMAIL, FILENAME, INSTITUTION,
    NAME, NATIONAL_ID, PHONE, POSITION, STATE_CODE, URL, ZIP_CODE,
};

pub fn validate_section(record: &SectionRecord) -> Result<(), ValidationFailure> {
    match record {
        SectionRecord::PersonalInfo(section) => validate_personal_info(section),
        SectionRecord::Education(section) => validate_education(section),
        SectionRecord::WorkExperience(section) => validate_work_experience(section),
        SectionRecord::References(section) => validate_references(section),
        SectionRecord::Documents(section) => validate_documents(section),
    }
}

pub fn validate_personal_info(info: &PersonalInfo) -> Result<(), ValidationFailure> {
    let root = "personalInfo";
    required(&format!("{root}.firstName"), "First name", &info.first_name, &NAME)?;
    required(&format!("{root}.lastName"), "Last name", &info.last_name, &NAME)?;
    required(&format!("{root}.email"), "Email", &info.email, &EMAIL)?;
    optional(&format!("{root}.phone"), &info.phone, &PHONE)?;
    optional(&format!("{root}.dateOfBirth"), &info.date_of_birth, &DATE)?;
    optional(&format!("{root}.nationalId"), &info.national_id, &NATIONAL_ID)?;
    if let Some(address) = &info.address {
        validate_address(&format!("{root}.address"), address)?;
    }
    Ok(())
}

fn validate_address(path: &str, address: &Address) -> Result<(), ValidationFailure> {
    optional(&format!("{path}.state"), &address.state, &STATE_CODE)?;
    optional(&format!("{path}.zipCode"), &address.zip_code, &ZIP_CODE)
}

pub fn validate_education(education: &Education) -> Result<(), ValidationFailure> {
    let root = "education.educationEntries";
    non_empty(
        root,
        &education.education_entries,
        "At least one education entry is required",
    )?;
    for (index, entry) in education.education_entries.iter().enumerate() {
        validate_education_entry(&format!("{root}[{index}]"), entry)?;
    }
    Ok(())
}

fn validate_education_entry(path: &str, entry: &EducationEntry) -> Result<(), ValidationFailure> {
    required(
        &format!("{path}.institution"),
        "Institution",
        &entry.institution,
        &INSTITUTION,
    )?;
    required(&format!("{path}.degree"), "Degree", &entry.degree, &DEGREE)?;
    optional(&format!("{path}.graduationDate"), &entry.graduation_date, &DATE)?;
    if let Some(gpa) = entry.gpa {
        check_gpa(gpa).map_err(|violation| violation.at(format!("{path}.gpa")))?;
    }
    Ok(())
}

pub fn validate_work_experience(work: &WorkExperience) -> Result<(), ValidationFailure> {
    let root = "workExperience.experiences";
    non_empty(
        root,
        &work.experiences,
        "At least one work experience entry is required",
    )?;
    for (index, experience) in work.experiences.iter().enumerate() {
        validate_experience(&format!("{root}[{index}]"), experience)?;
    }
    Ok(())
}

fn validate_experience(path: &str, experience: &Experience) -> Result<(), ValidationFailure> {
    required(
        &format!("{path}.employer"),
        "Employer",
        &experience.employer,
        &COMPANY,
    )?;
    required(
        &format!("{path}.position"),
        "Position",
        &experience.position,
        &POSITION,
    )?;
    optional(&format!("{path}.startDate"), &experience.start_date, &DATE)?;
    optional(&format!("{path}.endDate"), &experience.end_date, &DATE)?;
    if let Some(supervisor) = &experience.supervisor {
        validate_supervisor(&format!("{path}.supervisor"), supervisor)?;
    }
    Ok(())
}

fn validate_supervisor(path: &str, supervisor: &Supervisor) -> Result<(), ValidationFailure> {
    optional(&format!("{path}.name"), &supervisor.name, &NAME)?;
    optional(&format!("{path}.phone"), &supervisor.phone, &PHONE)?;
    optional(&format!("{path}.email"), &supervisor.email, &EMAIL)
}

pub fn validate_references(references: &References) -> Result<(), ValidationFailure> {
    let root = "references.references";
    non_empty(
        root,
        &references.references,
        "At least one reference is required",
    )?;
    for (index, reference) in references.references.iter().enumerate() {
        validate_reference(&format!("{root}[{index}]"), reference)?;
    }
    Ok(())
}

fn validate_reference(path: &str, reference: &Reference) -> Result<(), ValidationFailure> {
    optional(&format!("{path}.name"), &reference.name, &NAME)?;
    optional(&format!("{path}.company"), &reference.company, &COMPANY)?;
    optional(&format!("{path}.phone"), &reference.phone, &PHONE)?;
    optional(&format!("{path}.email"), &reference.email, &EMAIL)
}

pub fn validate_documents(documents: &Documents) -> Result<(), ValidationFailure> {
    let root = "documents.documents";
    non_empty(
        root,
        &documents.documents,
        "At least one document is required",
    )?;
    for (index, document) in documents.documents.iter().enumerate() {
        validate_document(&format!("{root}[{index}]"), document)?;
    }
    Ok(())
}

fn validate_document(path: &str, document: &ApplicationDocument) -> Result<(), ValidationFailure> {
    required(
        &format!("{path}.name"),
        "Document name",
        &document.name,
        &FILENAME,
    )?;
    optional(&format!("{path}.url"), &document.url, &URL)
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|candidate| !candidate.trim().is_empty())
}

fn required(
    field: &str,
    label: &str,
    value: &Option<String>,
    rule: &FieldRule,
) -> Result<(), ValidationFailure> {
    let value = present(value)
        .ok_or_else(|| ValidationFailure::new(field, format!("{label} is required")))?;
    rule.check(value).map_err(|violation| violation.at(field))
}

fn optional(field: &str, value: &Option<String>, rule: &FieldRule) -> Result<(), ValidationFailure> {
    match present(value) {
        Some(value) => rule.check(value).map_err(|violation| violation.at(field)),
        None => Ok(()),
    }
}

fn non_empty<T>(field: &str, entries: &[T], message: &str) -> Result<(), ValidationFailure> {
    if entries.is_empty() {
        Err(ValidationFailure::new(field, message))
    } else {
        Ok(())
    }
}
