use clap::{Parser, Subcommand};
use lti_media::jobs::JobsView;
use lti_media::models::{FieldValue, MediaFile};
use lti_media::series::SeriesView;
use lti_media::upload::UploadFlow;
use lti_media::{Config, MediaApi, MediaError, Messages, QueryContext, Requester, Result, Route};
use std::io::{stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lti-media", about = "Browse, upload and edit lecture episodes")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Route by the `tool` parameter, like the embedded page.
	Open {
		#[arg(long, default_value = "")]
		query: String,
	},
	/// List the episodes of a series.
	Series {
		#[arg(long, default_value = "")]
		query: String,
		#[arg(long, default_value_t = 1)]
		page: u64,
		/// Episode to delete (needs `deletion=true` and the instructor role).
		#[arg(long)]
		delete: Option<String>,
	},
	/// Upload a new episode, or edit one when the query has `episode_id`.
	Upload {
		#[arg(long, default_value = "")]
		query: String,
		#[arg(long)]
		presenter: Option<PathBuf>,
		#[arg(long)]
		caption: Option<PathBuf>,
		/// `field=value`; list fields take comma-separated values.
		#[arg(long = "set")]
		set: Vec<String>,
		/// Job table refreshes to show after submitting.
		#[arg(long, default_value_t = 0)]
		watch_jobs: u32,
		/// Lock refreshes to wait for before submitting an edit.
		#[arg(long, default_value_t = 0)]
		watch_locks: u32,
	},
	/// Copy the episode named by `episode_id` to another series.
	Copy {
		#[arg(long)]
		query: String,
		#[arg(long)]
		target: String,
	},
	/// Show the job table.
	Jobs {
		#[arg(long, default_value = "")]
		query: String,
		#[arg(long, default_value_t = 1)]
		ticks: u32,
	},
}

fn print(text: &str) -> Result<()> {
	let mut out = stdout();
	out.write_all(text.as_bytes())?;
	if !text.ends_with('\n') {
		out.write_all(b"\n")?;
	}
	out.flush()?;
	Ok(())
}

fn api_for(config: &Config, context: &QueryContext) -> Result<Arc<dyn MediaApi>> {
	Ok(Arc::new(Requester::for_context(config, context)?))
}

fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
	raw.split_once('=')
		.ok_or_else(|| MediaError::Domain(format!("expected field=value, got '{raw}'")))
}

async fn run_series(config: &Config, context: QueryContext, page: u64, delete: Option<String>) -> Result<()> {
	let messages = Messages::new();
	let mut view = SeriesView::new(api_for(config, &context)?, context, config.page_size);
	view.mount().await;
	if page != 1 {
		view.change_page(page).await;
	}
	if let Some(id) = delete {
		view.delete_episode(&id).await?;
	}
	print(&view.render(&messages))
}

async fn run_jobs(config: &Config, context: &QueryContext, ticks: u32) -> Result<()> {
	let messages = Messages::new();
	let mut view = JobsView::mount(api_for(config, context)?, context.series_ref(), config.poll_interval());
	for _ in 0..ticks {
		if view.refreshed().await.is_none() {
			break;
		}
		print(&view.render(&messages))?;
	}
	Ok(())
}

struct UploadArgs {
	presenter: Option<PathBuf>,
	caption: Option<PathBuf>,
	set: Vec<String>,
	watch_jobs: u32,
	watch_locks: u32,
}

async fn run_upload(config: &Config, context: QueryContext, args: UploadArgs) -> Result<()> {
	let messages = Messages::new();
	let mut flow = UploadFlow::new(api_for(config, &context)?, context.clone());
	flow.load().await;
	print(&flow.render(&messages))?;
	if !flow.can_submit() {
		return Ok(());
	}

	if args.watch_locks > 0 {
		if let Some(mut watch) = flow.watch_locks(config.poll_interval()) {
			for _ in 0..args.watch_locks {
				let Some(fresh) = watch.next().await else {
					break;
				};
				if flow.apply_lock_refresh(&fresh) {
					print(&flow.render(&messages))?;
				}
			}
		}
	}

	for raw in &args.set {
		let (id, value) = parse_assignment(raw)?;
		let is_list = matches!(flow.form().field(id).map(|f| &f.value), Some(FieldValue::List(_)));
		let value = if is_list {
			FieldValue::List(value.split(',').map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()).collect())
		} else {
			FieldValue::Text(value.to_owned())
		};
		flow.form_mut().set_value(id, value)?;
	}
	if let Some(path) = args.presenter {
		flow.form_mut().set_presenter_file(MediaFile::read(path).await?);
	}
	if let Some(path) = args.caption {
		flow.form_mut().set_caption_file(MediaFile::read(path).await?);
	}

	if flow.submit().await {
		print(&flow.render(&messages))?;
	} else {
		print(&messages.t("NO_FILE_SELECTED"))?;
	}

	if args.watch_jobs > 0 {
		run_jobs(config, &context, args.watch_jobs).await?;
	}
	Ok(())
}

async fn run_copy(config: &Config, context: QueryContext, target: String) -> Result<()> {
	let messages = Messages::new();
	let mut flow = UploadFlow::new(api_for(config, &context)?, context);
	flow.load().await;
	let choices = flow.series_choices(&messages);
	if !choices.is_empty() && !choices.iter().any(|c| c.value == target) {
		tracing::warn!(%target, "target is not among the series offered for copying");
	}
	flow.copy_to_series(&target).await?;
	print(&flow.render(&messages))
}

async fn run_open(config: &Config, context: QueryContext) -> Result<()> {
	let messages = Messages::new();
	match Route::from_context(&context) {
		Route::Welcome => print(&messages.t("WELCOME")),
		Route::Series => run_series(config, context, 1, None).await,
		Route::Upload => {
			let mut flow = UploadFlow::new(api_for(config, &context)?, context.clone());
			flow.load().await;
			print(&flow.render(&messages))?;
			run_jobs(config, &context, 1).await
		}
		Route::Other(tool) => print(&messages.t_with("UNKNOWN_TOOL", &[("tool", &tool)])),
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	let config = Config::load()?;
	match cli.command {
		Command::Open { query } => run_open(&config, QueryContext::parse(&query)).await,
		Command::Series { query, page, delete } => {
			run_series(&config, QueryContext::parse(&query), page, delete).await
		}
		Command::Upload {
			query,
			presenter,
			caption,
			set,
			watch_jobs,
			watch_locks,
		} => {
			let args = UploadArgs {
				presenter,
				caption,
				set,
				watch_jobs,
				watch_locks,
			};
			run_upload(&config, QueryContext::parse(&query), args).await
		}
		Command::Copy { query, target } => run_copy(&config, QueryContext::parse(&query), target).await,
		Command::Jobs { query, ticks } => run_jobs(&config, &QueryContext::parse(&query), ticks).await,
	}
}
