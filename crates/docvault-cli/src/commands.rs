//! Command handlers. Each one mirrors a screen of the mobile app.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context as _, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{error, warn};

use docvault_core::auth::TokenStore;
use docvault_core::models::{
    DocumentItem, DocumentMetadata, DocumentUpload, MajorHead, PreviewKind, SearchCriteria,
    TagRef, UploadFile,
};
use docvault_core::utils::{
    add_tag, is_valid_mobile_number, is_valid_otp, parse_ddmmyyyy, parse_tag_list,
    truncate_string,
};
use docvault_core::{ApiClient, ApiError, Config, Operation, SessionManager};

/// Width of the remarks column in search output
const REMARKS_WIDTH: usize = 40;

pub struct Context {
    pub api: ApiClient,
    pub session: SessionManager<Box<dyn TokenStore>>,
    pub config: Config,
    pub json: bool,
}

pub struct UploadArgs {
    pub file: PathBuf,
    pub major: String,
    pub minor: String,
    pub date: Option<String>,
    pub remarks: String,
    pub tags: Vec<String>,
}

pub struct SearchArgs {
    pub major: String,
    pub minor: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub tags: String,
    pub start: u32,
    pub length: u32,
}

/// Log the full error, hand back the generic text for the user
fn report(err: ApiError, op: Operation) -> anyhow::Error {
    error!(error = %err, operation = ?op, "Request failed");
    anyhow!(err.user_message(op))
}

fn parse_date_arg(value: Option<&str>, label: &str) -> Result<NaiveDate> {
    match value {
        Some(s) => parse_ddmmyyyy(s)
            .ok_or_else(|| anyhow!("Invalid {} date '{}', expected DD-MM-YYYY", label, s)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Canonical (major, minor) pair from user input
fn resolve_heads(major: &str, minor: &str) -> Result<(String, String)> {
    let head: MajorHead = major.parse().map_err(|e: String| anyhow!(e))?;
    let minor = head.minor_head(minor).ok_or_else(|| {
        anyhow!(
            "Unknown minor head '{}' for {}, expected one of: {}",
            minor,
            head,
            head.minor_heads().join(", ")
        )
    })?;
    Ok((head.as_str().to_string(), minor.to_string()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ===== Login / Profile =====

pub async fn login(ctx: &mut Context, mobile_number: Option<String>) -> Result<()> {
    let mobile = mobile_number
        .or_else(|| ctx.config.last_mobile_number.clone())
        .map(|m| m.trim().to_string())
        .ok_or_else(|| anyhow!("Please enter a 10-digit mobile number"))?;
    if !is_valid_mobile_number(&mobile) {
        bail!("Please enter a valid 10-digit mobile number");
    }

    let response = ctx
        .api
        .generate_otp(&mobile)
        .await
        .map_err(|e| report(e, Operation::GenerateOtp))?;
    if !response.is_success() {
        bail!("{}", response.message_or("Failed to send OTP"));
    }

    ctx.config.last_mobile_number = Some(mobile.clone());
    if let Err(e) = ctx.config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("OTP sent to {}", mobile);
    let otp = rpassword::prompt_password("Enter 6-digit OTP: ").context("Failed to read OTP")?;
    let otp = otp.trim();
    if !is_valid_otp(otp) {
        bail!("Please enter a valid 6-digit OTP");
    }

    let response = ctx
        .api
        .validate_otp(&mobile, otp)
        .await
        .map_err(|e| report(e, Operation::ValidateOtp))?;
    if !response.is_success() {
        bail!("{}", response.message_or("Invalid OTP"));
    }

    let verification = response
        .data()
        .map_err(|e| report(ApiError::format(e, ""), Operation::ValidateOtp))?
        .ok_or_else(|| anyhow!("Invalid OTP"))?;

    // Storage failures are already logged; the session is live for this run
    let _persisted = ctx.session.login(
        verification.token,
        verification.user_name,
        verification.user_id,
    );

    match ctx.session.user().name.as_deref() {
        Some(name) => println!("Logged in as {}", name),
        None => println!("Logged in"),
    }
    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    let _persisted = ctx.session.logout();
    println!("Logged out");
    Ok(())
}

#[derive(Serialize)]
struct StatusView<'a> {
    authenticated: bool,
    user_name: Option<&'a str>,
    user_id: Option<&'a str>,
    api_base_url: &'a str,
}

pub fn status(ctx: &Context) -> Result<()> {
    let user = ctx.session.user();
    let view = StatusView {
        authenticated: ctx.session.is_authenticated(),
        user_name: user.name.as_deref(),
        user_id: user.id.as_deref(),
        api_base_url: ctx.api.base_url(),
    };

    if ctx.json {
        return print_json(&view);
    }

    if view.authenticated {
        println!("Logged in");
        println!("  Name: {}", view.user_name.unwrap_or("(unknown)"));
        println!("  User ID: {}", view.user_id.unwrap_or("(unknown)"));
    } else {
        println!("Not logged in");
    }
    println!("  Server: {}", view.api_base_url);
    Ok(())
}

// ===== Upload =====

pub async fn tags(ctx: &Context, term: &str) -> Result<()> {
    let token = ctx.session.require_token()?;
    let response = ctx
        .api
        .get_document_tags(term, token)
        .await
        .map_err(|e| report(e, Operation::Tags))?;
    if !response.is_success() {
        bail!("{}", response.message_or("Failed to load tags"));
    }

    let tags = response
        .data()
        .map_err(|e| report(ApiError::format(e, ""), Operation::Tags))?
        .unwrap_or_default();

    if ctx.json {
        return print_json(&tags);
    }
    if tags.is_empty() {
        println!("No tags found");
    }
    for tag in &tags {
        println!("{}", tag.id);
    }
    Ok(())
}

pub async fn upload(ctx: &Context, args: UploadArgs) -> Result<()> {
    let token = ctx.session.require_token()?;
    let (major_head, minor_head) = resolve_heads(&args.major, &args.minor)?;
    let document_date = parse_date_arg(args.date.as_deref(), "document")?;

    let mut tags = Vec::new();
    for tag in &args.tags {
        add_tag(&mut tags, tag);
    }

    let user_id = ctx.session.user().id.clone();
    if user_id.is_none() {
        warn!("User id unknown for this session, uploading without it");
    }

    let file = UploadFile::from_path(&args.file)
        .await
        .map_err(|e| report(ApiError::from_io(e, &args.file), Operation::Upload))?;

    let upload = DocumentUpload {
        file,
        metadata: DocumentMetadata {
            major_head,
            minor_head,
            document_date,
            document_remarks: args.remarks,
            tags: TagRef::from_names(tags),
            user_id,
        },
    };

    let response = ctx
        .api
        .upload_document(&upload, token)
        .await
        .map_err(|e| report(e, Operation::Upload))?;
    if !response.is_success() {
        bail!("{}", response.message_or("Failed to upload document"));
    }

    println!("Document uploaded successfully");
    Ok(())
}

// ===== Search =====

fn print_documents(items: &[DocumentItem]) {
    if items.is_empty() {
        println!("No documents found");
        return;
    }
    for item in items {
        println!(
            "#{:<6} {:<10} {:<24} {}",
            item.document_id,
            item.document_date,
            item.heads_display(),
            truncate_string(&item.document_remarks, REMARKS_WIDTH)
        );
        let uploaded = match (&item.uploaded_by, &item.upload_time) {
            (Some(by), Some(at)) => format!(" (uploaded by {} at {})", by, at),
            (Some(by), None) => format!(" (uploaded by {})", by),
            _ => String::new(),
        };
        println!("        {}{}", item.file_url, uploaded);
    }
}

pub async fn search(ctx: &Context, args: SearchArgs) -> Result<()> {
    let token = ctx.session.require_token()?;

    let (major_head, minor_head) = match (args.major.trim(), args.minor.trim()) {
        ("", "") => (String::new(), String::new()),
        (major, "") => {
            let head: MajorHead = major.parse().map_err(|e: String| anyhow!(e))?;
            (head.as_str().to_string(), String::new())
        }
        (major, minor) => resolve_heads(major, minor)?,
    };

    let criteria = SearchCriteria {
        major_head,
        minor_head,
        from_date: parse_date_arg(args.from.as_deref(), "from")?,
        to_date: parse_date_arg(args.to.as_deref(), "to")?,
        tags: TagRef::from_names(parse_tag_list(&args.tags)),
        start: args.start,
        length: args.length,
        ..SearchCriteria::default()
    };

    let response = ctx
        .api
        .search_documents(&criteria, token)
        .await
        .map_err(|e| report(e, Operation::Search))?;
    if !response.is_success() {
        bail!("{}", response.message_or("Failed to search documents"));
    }

    let items = response
        .data()
        .map_err(|e| report(ApiError::format(e, ""), Operation::Search))?
        .unwrap_or_default();

    if ctx.json {
        return print_json(&items);
    }
    print_documents(&items);
    Ok(())
}

pub fn preview(ctx: &Context, url: &str) -> Result<()> {
    let kind = PreviewKind::for_url(url);
    if ctx.json {
        return print_json(&serde_json::json!({
            "url": url,
            "previewable": kind != PreviewKind::Unsupported,
            "kind": kind.description(),
        }));
    }
    match kind {
        PreviewKind::Image | PreviewKind::Pdf => {
            println!("{} can be previewed as {}", url, kind.description())
        }
        PreviewKind::Unsupported => println!("Preview Not Available: {}", kind.description()),
    }
    Ok(())
}

pub async fn download(
    ctx: &Context,
    url: &str,
    name: Option<&str>,
    dir: Option<PathBuf>,
) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => ctx.config.download_dir()?,
    };

    let saved = ctx
        .api
        .download_document(url, name, &dir)
        .await
        .map_err(|e| report(e, Operation::Download))?;
    println!("File downloaded to {}", saved.display());
    Ok(())
}
