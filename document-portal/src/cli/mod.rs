//! CLI definitions and the views behind each subcommand.

pub mod views;

use crate::documents::{DocumentFilters, ReferenceData, SortOrder};
use crate::download::download_error_message;
use crate::error::PortalError;
use crate::forms::{DocumentFields, FileUpload, UploadForm};
use crate::guard::require_user;
use crate::models::{AccessLevel, AuthUser};
use crate::permissions::Permissions;
use crate::PortalContext;
use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "document-portal",
    version,
    about = "Browse, upload and manage portal documents",
    infer_subcommands = true,
    after_help = "Examples:\n  document-portal login --email admin@abc.test\n  document-portal list --search handbook --department Finance\n  document-portal upload --title Handbook --category HR --department Finance ./handbook.pdf"
)]
pub struct Cli {
    /// Settings file (defaults to config/base.yaml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Override the configured log level.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Search title and description.
    #[arg(long, short)]
    pub search: Option<String>,
    /// Category id or title.
    #[arg(long)]
    pub category: Option<String>,
    /// Department id or name.
    #[arg(long)]
    pub department: Option<String>,
    /// newest, oldest, title_asc or title_desc.
    #[arg(long, default_value = "newest")]
    pub sort: SortOrder,
}

impl FilterArgs {
    fn resolve(&self, reference: &ReferenceData) -> DocumentFilters {
        DocumentFilters::default()
            .with_search(self.search.clone().unwrap_or_default())
            .with_category(
                self.category
                    .as_deref()
                    .map(|c| reference.resolve_category(c).unwrap_or_else(|| c.to_string())),
            )
            .with_department(
                self.department
                    .as_deref()
                    .map(|d| reference.resolve_department(d).unwrap_or_else(|| d.to_string())),
            )
            .with_sort(self.sort)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and forget the session token.
    Logout,
    /// Show the logged-in user and what they may do.
    Whoami,
    /// List documents.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one document.
    Show { id: String },
    /// Upload a new document (admin or manager).
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Category id or title.
        #[arg(long)]
        category: Option<String>,
        /// Department id or name.
        #[arg(long)]
        department: Option<String>,
        #[arg(long, default_value = "public")]
        access_level: AccessLevel,
        file: PathBuf,
    },
    /// Edit document metadata (admin or manager).
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        access_level: Option<AccessLevel>,
    },
    /// Delete a document (admin or manager).
    Delete {
        id: String,
        /// List page the document is on; the list is reloaded afterwards.
        #[arg(long)]
        page: Option<u32>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Download a document's file.
    Download {
        id: String,
        /// Output path (defaults to the server-provided file name).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List document categories.
    Categories,
    /// List departments.
    Departments,
}

fn fail(error: PortalError, fallback: &str) -> anyhow::Error {
    anyhow!(error.user_message(fallback))
}

/// Boot the session and pass the route guard.
async fn protected(ctx: &PortalContext) -> Result<AuthUser> {
    ctx.session.boot().await;
    require_user(&ctx.session)
        .await
        .map_err(|e| fail(e, "Not logged in."))
}

pub async fn run(command: Command, ctx: PortalContext) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let auth = ctx
                .session
                .login(&email, &password)
                .await
                .map_err(|e| fail(e, "Login failed."))?;
            println!("{}", views::render_login(&auth.user));
        }
        Command::Logout => {
            ctx.session.logout().await;
            println!("Logged out.");
        }
        Command::Whoami => {
            let auth = protected(&ctx).await?;
            println!("{}", views::render_profile(&auth.user));
        }
        Command::List { filters, page } => {
            let auth = protected(&ctx).await?;
            let mut list = ctx.list_controller();
            list.load_reference_data().await;
            let resolved = filters.resolve(list.reference());
            // The controller keeps the failure message for rendering.
            let _ = list.open_at(resolved, page).await;
            println!(
                "{}",
                views::render_list(&list, Permissions::for_user(&auth.user))
            );
            if let Some(error) = list.error() {
                return Err(anyhow!(error.to_string()));
            }
        }
        Command::Show { id } => {
            let auth = protected(&ctx).await?;
            let doc = ctx
                .actions()
                .show(&id)
                .await
                .map_err(|e| fail(e, "Failed to load document."))?;
            match doc {
                Some(doc) => println!(
                    "{}",
                    views::render_details(&doc, Permissions::for_user(&auth.user))
                ),
                None => println!("Document not found."),
            }
        }
        Command::Upload {
            title,
            description,
            category,
            department,
            access_level,
            file,
        } => {
            protected(&ctx).await?;
            let actions = ctx.actions();
            let reference = actions
                .reference_data()
                .await
                .map_err(|e| fail(e, "Upload failed."))?;

            let file = FileUpload::from_path(&file)
                .await
                .map_err(|e| anyhow!("Failed to read {}: {}", file.display(), e))?;
            let form = UploadForm {
                fields: DocumentFields {
                    title,
                    description,
                    category_id: category.map(|c| reference.resolve_category(&c).unwrap_or(c)),
                    department_id: department
                        .map(|d| reference.resolve_department(&d).unwrap_or(d)),
                    access_level: Some(access_level),
                },
                file: Some(file),
            };

            let created = actions
                .upload(&form)
                .await
                .map_err(|e| fail(e, "Upload failed."))?;
            println!("Upload successful.");
            if let Some(doc) = created {
                println!("{}", views::render_details(&doc, Permissions::default()));
            }
        }
        Command::Edit {
            id,
            title,
            description,
            category,
            department,
            access_level,
        } => {
            protected(&ctx).await?;
            let actions = ctx.actions();
            let mut edit = actions
                .edit_form(&id)
                .await
                .map_err(|e| fail(e, "Failed to load document."))?;

            if let Some(title) = title {
                edit.fields.title = title;
            }
            if let Some(description) = description {
                edit.fields.description = description;
            }
            if let Some(category) = category {
                edit.fields.category_id =
                    Some(edit.reference.resolve_category(&category).unwrap_or(category));
            }
            if let Some(department) = department {
                edit.fields.department_id = Some(
                    edit.reference
                        .resolve_department(&department)
                        .unwrap_or(department),
                );
            }
            if access_level.is_some() {
                edit.fields.access_level = access_level;
            }

            actions
                .update(&id, &edit.fields)
                .await
                .map_err(|e| fail(e, "Update failed."))?;
            println!("Document updated.");
        }
        Command::Delete { id, page, filters } => {
            let auth = protected(&ctx).await?;
            match page {
                Some(page) => {
                    let mut list = ctx.list_controller();
                    list.load_reference_data().await;
                    let resolved = filters.resolve(list.reference());
                    list.open_at(resolved, page)
                        .await
                        .map_err(|e| fail(e.into(), "Failed to load documents."))?;
                    list.delete(&id)
                        .await
                        .map_err(|e| fail(e, "Delete failed."))?;
                    println!("Document deleted.");
                    println!(
                        "{}",
                        views::render_list(&list, Permissions::for_user(&auth.user))
                    );
                }
                None => {
                    ctx.actions()
                        .delete(&id)
                        .await
                        .map_err(|e| fail(e, "Delete failed."))?;
                    println!("Document deleted.");
                }
            }
        }
        Command::Download { id, output } => {
            protected(&ctx).await?;
            let actions = ctx.actions();
            let file = actions
                .download(&id, None)
                .await
                .map_err(|e| match e {
                    PortalError::Api(api) => anyhow!(download_error_message(&api)),
                    other => fail(other, "Download failed."),
                })?;

            // Only the final component of a server-provided name is used.
            let path = output.unwrap_or_else(|| {
                Path::new(&file.filename)
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(format!("document_{}", id)))
            });
            tokio::fs::write(&path, &file.bytes)
                .await
                .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;
            println!("Saved {} ({} bytes)", path.display(), file.bytes.len());
        }
        Command::Categories => {
            protected(&ctx).await?;
            let categories = ctx
                .actions()
                .categories()
                .await
                .map_err(|e| fail(e, "Failed to load categories."))?;
            println!("{}", views::render_categories(&categories));
        }
        Command::Departments => {
            protected(&ctx).await?;
            let departments = ctx
                .actions()
                .departments()
                .await
                .map_err(|e| fail(e, "Failed to load departments."))?;
            println!("{}", views::render_departments(&departments));
        }
    }

    Ok(())
}
