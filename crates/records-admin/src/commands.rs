//! Command handlers for the CLI

use anyhow::{bail, Context};
use records_shared::{ids, validate};
use records_store::{
    now, Archive, Citizen, Database, Document, DocumentStatus, RequestStatus, ServiceRequest,
};
use serde::Serialize;

use crate::{ArchiveCommands, CitizenCommands, DocumentCommands, RequestCommands};

type CmdResult = anyhow::Result<()>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Validate and insert a new citizen with a freshly minted id.
pub fn register_citizen(
    db: &mut Database,
    name: &str,
    email: &str,
    number: &str,
    password: &str,
) -> anyhow::Result<Citizen> {
    let (name, email, number) = (name.trim(), email.trim(), number.trim());
    validate::validate_citizen(name, email, number, password)?;

    let id = ids::citizen_id(db.list_citizens().len(), now());
    let citizen = Citizen::new(id, name, email, number, password);
    db.add_citizen(&citizen)
        .with_context(|| format!("failed to register citizen {}", citizen.id))?;
    Ok(citizen)
}

/// Apply the given profile changes to a citizen, validating the result.
pub fn edit_citizen(
    db: &mut Database,
    id: &str,
    name: Option<String>,
    email: Option<String>,
    number: Option<String>,
    password: Option<String>,
) -> anyhow::Result<Citizen> {
    let mut citizen = db.get_citizen(id).with_context(|| format!("citizen {id}"))?;
    if let Some(name) = name {
        citizen.name = name.trim().to_string();
    }
    if let Some(email) = email {
        citizen.email = email.trim().to_string();
    }
    if let Some(number) = number {
        citizen.number = number.trim().to_string();
    }
    if let Some(password) = password {
        citizen.password = password;
    }
    validate::validate_citizen(&citizen.name, &citizen.email, &citizen.number, &citizen.password)?;

    if !db.update_citizen(id, &citizen)? {
        bail!("citizen {id} disappeared during update");
    }
    Ok(citizen)
}

/// Submit a request on behalf of an active citizen.
pub fn submit_request(
    db: &mut Database,
    citizen_id: &str,
    service_type: &str,
    description: &str,
) -> anyhow::Result<ServiceRequest> {
    db.get_citizen(citizen_id)
        .with_context(|| format!("citizen {citizen_id}"))?;

    let id = ids::request_id(citizen_id, now());
    let request = ServiceRequest::new(id, citizen_id, service_type.trim(), description.trim());
    Ok(db.add_request(&request)?)
}

pub fn set_request_status(
    db: &mut Database,
    id: &str,
    status: RequestStatus,
    note: Option<String>,
) -> anyhow::Result<ServiceRequest> {
    let mut request = db.get_request(id).with_context(|| format!("request {id}"))?;
    request.status = status;
    if let Some(note) = note {
        request.admin_note = note;
    }
    if !db.update_request(id, &request)? {
        bail!("request {id} disappeared during update");
    }
    Ok(request)
}

/// Attach a pending document to a request. The owner is taken from the
/// request.
pub fn upload_document(
    db: &mut Database,
    request_id: &str,
    file_path: &str,
) -> anyhow::Result<Document> {
    let request = db
        .get_request(request_id)
        .with_context(|| format!("request {request_id}"))?;

    let id = ids::document_id(&request.citizen_id, now());
    let document = Document::new(id, request_id, file_path, request.citizen_id);
    db.add_document(&document)?;
    Ok(document)
}

pub fn review_document(
    db: &mut Database,
    id: &str,
    status: DocumentStatus,
    comment: Option<String>,
) -> anyhow::Result<Document> {
    let mut document = db.get_document(id).with_context(|| format!("document {id}"))?;
    document.set_status(status);
    if let Some(comment) = comment {
        document.review_comment = comment;
    }
    if !db.update_document(id, &document)? {
        bail!("document {id} disappeared during update");
    }
    Ok(document)
}

/// Handle citizen commands
pub(crate) fn handle_citizen_command(action: CitizenCommands, db: &mut Database) -> CmdResult {
    match action {
        CitizenCommands::Register {
            name,
            email,
            number,
            password,
        } => print_json(&register_citizen(db, &name, &email, &number, &password)?),
        CitizenCommands::List => print_json(&db.list_citizens()),
        CitizenCommands::Get { id } => {
            print_json(&db.get_citizen(&id).with_context(|| format!("citizen {id}"))?)
        }
        CitizenCommands::Update {
            id,
            name,
            email,
            number,
            password,
        } => print_json(&edit_citizen(db, &id, name, email, number, password)?),
        CitizenCommands::Login { id, password } => {
            let citizen = db.get_citizen(&id).with_context(|| format!("citizen {id}"))?;
            if !citizen.verify_password(&password) {
                bail!("wrong password for citizen {id}");
            }
            print_json(&citizen)
        }
        CitizenCommands::Archive { id, reason } => print_json(
            &db.archive_citizen(&id, &reason)
                .with_context(|| format!("failed to archive citizen {id}"))?,
        ),
        CitizenCommands::Restore { id } => print_json(
            &db.restore_citizen(&id)
                .with_context(|| format!("failed to restore citizen {id}"))?,
        ),
    }
}

/// Handle request commands
pub(crate) fn handle_request_command(action: RequestCommands, db: &mut Database) -> CmdResult {
    match action {
        RequestCommands::Submit {
            citizen,
            service_type,
            description,
        } => print_json(&submit_request(db, &citizen, &service_type, &description)?),
        RequestCommands::List { citizen } => match citizen {
            Some(citizen) => print_json(&db.list_requests_for_citizen(&citizen)),
            None => print_json(&db.list_requests()),
        },
        RequestCommands::Get { id } => {
            print_json(&db.get_request(&id).with_context(|| format!("request {id}"))?)
        }
        RequestCommands::Status { id, status, note } => {
            print_json(&set_request_status(db, &id, status, note)?)
        }
        RequestCommands::Archive { id, reason } => print_json(
            &db.archive_request(&id, &reason)
                .with_context(|| format!("failed to archive request {id}"))?,
        ),
        RequestCommands::Delete { id } => {
            print_json(&serde_json::json!({ "deleted": db.delete_request(&id)? }))
        }
    }
}

/// Handle document commands
pub(crate) fn handle_document_command(action: DocumentCommands, db: &mut Database) -> CmdResult {
    match action {
        DocumentCommands::Upload { request, file } => {
            print_json(&upload_document(db, &request, &file)?)
        }
        DocumentCommands::List { request, citizen } => {
            let mut documents = match &request {
                Some(request) => db.list_documents_for_request(request),
                None => db.list_documents(),
            };
            if let Some(citizen) = citizen {
                documents.retain(|d| d.citizen_id == citizen);
            }
            print_json(&documents)
        }
        DocumentCommands::Get { id } => {
            print_json(&db.get_document(&id).with_context(|| format!("document {id}"))?)
        }
        DocumentCommands::Review {
            id,
            status,
            comment,
        } => print_json(&review_document(db, &id, status, comment)?),
        DocumentCommands::Archive { id, reason } => print_json(
            &db.archive_document(&id, &reason)
                .with_context(|| format!("failed to archive document {id}"))?,
        ),
        DocumentCommands::Delete { id } => {
            print_json(&serde_json::json!({ "deleted": db.delete_document(&id)? }))
        }
    }
}

/// Handle archive commands
pub(crate) fn handle_archive_command(action: ArchiveCommands, db: &Database) -> CmdResult {
    match action {
        ArchiveCommands::List { archive_type } => {
            let archives: Vec<Archive> = match archive_type {
                Some(archive_type) => db.list_archives_by_type(archive_type),
                None => db.list_archives(),
            };
            print_json(&archives)
        }
        ArchiveCommands::Get { id } => {
            print_json(&db.get_archive(&id).with_context(|| format!("archive {id}"))?)
        }
    }
}
