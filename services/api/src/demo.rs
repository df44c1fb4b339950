use crate::infra::InMemoryApplicationStore;
use clap::Args;
use licensing_portal::applications::{
    Address, ApplicationDocument, ApplicationService, ApplicationServiceError, Documents,
    Education, EducationEntry, Experience, PersonalInfo, Reference, References, ReviewDecision,
    Supervisor, WorkExperience,
};
use licensing_portal::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Applicant user id recorded on the sample application.
    #[arg(long, default_value = "demo-applicant")]
    pub(crate) user_id: String,
    /// License type the sample application requests.
    #[arg(long, default_value = "professional-engineer")]
    pub(crate) license_type: String,
    /// End the review with a rejection instead of an approval.
    #[arg(long)]
    pub(crate) reject: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            user_id: "demo-applicant".to_string(),
            license_type: "professional-engineer".to_string(),
            reject: false,
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = ApplicationService::new(Arc::new(InMemoryApplicationStore::default()));

    println!("License application demo");
    let application = service.create_application(&args.user_id, &args.license_type)?;
    let id = &application.id;
    println!(
        "  Created {} for {} ({}) in status {}",
        id, application.user_id, application.license_type_id, application.status
    );

    match service.submit_application(id) {
        Err(ApplicationServiceError::Validation(failure)) => {
            println!("  Early submit refused: {}", failure.message);
        }
        Err(other) => return Err(other.into()),
        Ok(_) => println!("  Early submit unexpectedly accepted"),
    }

    match service.save_section(id, sample_bad_contact()) {
        Err(ApplicationServiceError::Validation(failure)) => {
            println!(
                "  Rejected personal info: {} ({})",
                failure.message, failure.field
            );
        }
        Err(other) => return Err(other.into()),
        Ok(_) => println!("  Invalid personal info unexpectedly accepted"),
    }

    service.save_section(id, sample_personal_info())?;
    println!("  Saved personal information");
    service.save_section(id, sample_education())?;
    println!("  Saved education");
    service.save_section(id, sample_work_experience())?;
    println!("  Saved work experience");
    service.save_section(id, sample_references())?;
    println!("  Saved references");
    let documents = service.save_section(id, sample_documents())?;
    println!("  Saved {} document(s)", documents.documents.len());

    let report = service.completeness(id)?;
    println!(
        "  Completeness: {} of {} sections on file",
        report.present.len(),
        report.present.len() + report.missing.len()
    );

    let submitted = service.submit_application(id)?;
    let submitted_on = submitted
        .submission_date
        .map(|date| date.to_rfc3339())
        .unwrap_or_else(|| "n/a".to_string());
    println!("  Submitted on {submitted_on}");

    let reviewing = service.update_status(id, "under_review")?;
    println!("  Status is now {}", reviewing.status);

    let (status, note) = if args.reject {
        ("rejected", "Work history does not meet the experience requirement")
    } else {
        ("approved", "All requirements satisfied")
    };
    let decided = service.record_review(
        id,
        ReviewDecision {
            status: status.to_string(),
            reviewer: "demo-board".to_string(),
            note: Some(note.to_string()),
        },
    )?;
    println!("  Final status: {}", decided.status);
    if let Some(notes) = &decided.review_notes {
        println!(
            "  Review by {}: {}",
            notes.reviewer,
            notes.note.as_deref().unwrap_or("no note")
        );
    }

    if let Err(error) = service.update_status(id, "draft") {
        println!("  Reopen refused: {error}");
    }

    match serde_json::to_string_pretty(&decided) {
        Ok(json) => println!("  Application payload:\n{json}"),
        Err(err) => println!("  Application payload unavailable: {err}"),
    }

    Ok(())
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn sample_personal_info() -> PersonalInfo {
    PersonalInfo {
        first_name: text("Casey"),
        last_name: text("Morgan"),
        email: text("casey.morgan@example.com"),
        phone: text("573-555-0175"),
        date_of_birth: text("1985-02-28"),
        national_id: text("219-09-9999"),
        address: Some(Address {
            street: text("400 High St"),
            city: text("Jefferson City"),
            state: text("MO"),
            zip_code: text("65101"),
            country: text("USA"),
        }),
        ..PersonalInfo::default()
    }
}

fn sample_bad_contact() -> PersonalInfo {
    PersonalInfo {
        phone: text("555-01"),
        ..sample_personal_info()
    }
}

fn sample_education() -> Education {
    Education {
        education_entries: vec![EducationEntry {
            institution: text("Missouri University of Science and Technology"),
            degree: text("Bachelor of Science"),
            major: text("Mechanical Engineering"),
            graduation_date: text("2007-05-12"),
            gpa: Some(3.4),
        }],
        ..Education::default()
    }
}

fn sample_work_experience() -> WorkExperience {
    WorkExperience {
        experiences: vec![Experience {
            employer: text("Capitol Engineering Co."),
            position: text("Senior Engineer"),
            start_date: text("2008-01-07"),
            end_date: None,
            current: true,
            responsibilities: text("HVAC design review"),
            supervisor: Some(Supervisor {
                name: text("Jamie Ortiz"),
                phone: text("573-555-0120"),
                email: text("jamie.ortiz@example.com"),
            }),
        }],
        ..WorkExperience::default()
    }
}

fn sample_references() -> References {
    References {
        references: vec![Reference {
            name: text("Pat Lee"),
            relationship: text("Former manager"),
            company: text("Lee & Partners"),
            phone: text("314-555-0188"),
            email: text("pat.lee@example.com"),
            years_known: Some(9),
        }],
        ..References::default()
    }
}

fn sample_documents() -> Documents {
    Documents {
        documents: vec![ApplicationDocument {
            document_type: text("transcript"),
            name: text("official_transcript.pdf"),
            url: text("https://records.example.com/casey/transcript.pdf"),
            ..ApplicationDocument::default()
        }],
        ..Documents::default()
    }
}
