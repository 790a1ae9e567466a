use std::{process, sync::Arc};

use linksly::{
    application::{
        error::{AppError, error_chain},
        export::{ExportReport, StaticExporter},
        render::{LinkResolver, PageRenderer, RouteLinks, StaticLinks},
        subscribe::SubscriptionService,
    },
    config,
    domain::{catalog::ALL_PAGES, site::SiteMetadata},
    infra::{
        assets::StaticAssets,
        error::InfraError,
        http::{self, ApiState, HttpState, RouterState},
        subscribers::FileSubscriberLog,
        telemetry,
        templates::{load_shared_templates, load_templates},
    },
};
use tera::Tera;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let chain = error_chain(error);
    if dispatcher::has_been_set() {
        error!(error = %error, chain = ?chain, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, chain = ?chain, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Export(_) => run_export(settings).await,
    }
}

fn build_renderer(
    settings: &config::Settings,
    tera: Tera,
    links: Arc<dyn LinkResolver>,
) -> PageRenderer {
    PageRenderer::new(tera, Arc::new(settings.site.clone()), links)
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let tera = load_templates(&settings.paths.templates)?;
    let renderer = build_renderer(&settings, tera, Arc::new(RouteLinks));
    renderer.ensure_catalog()?;

    if settings.security.uses_default_key() {
        warn!(
            target = "linksly::serve",
            "SECRET_KEY is not set; using the development default"
        );
    }

    let subscriber_log = FileSubscriberLog::new(settings.paths.subscribers_log.clone());
    let assets = StaticAssets::new(settings.paths.static_dir.clone());
    info!(
        target = "linksly::serve",
        mode = renderer.mode(),
        templates = %settings.paths.templates.display(),
        assets = %assets.root().display(),
        subscribers_log = %subscriber_log.path().display(),
        "Site loaded"
    );

    let router = http::build_router(RouterState {
        http: HttpState {
            renderer: Arc::new(renderer),
            assets: Arc::new(assets),
        },
        api: ApiState {
            subscriptions: Arc::new(SubscriptionService::new(Arc::new(subscriber_log))),
        },
    });

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(target = "linksly::serve", addr = %settings.server.addr, "Listening");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_export(settings: config::Settings) -> Result<(), AppError> {
    // Pages are parsed one by one during the run; only layouts load here.
    let pages: Vec<&str> = ALL_PAGES.iter().map(|page| page.template()).collect();
    let layouts = load_shared_templates(&settings.paths.templates, &pages)?;
    let renderer = build_renderer(&settings, layouts, Arc::new(StaticLinks));
    let exporter = StaticExporter::new(
        renderer,
        settings.paths.templates.clone(),
        settings.paths.static_dir.clone(),
        settings.paths.output.clone(),
    );

    let report = tokio::task::spawn_blocking(move || exporter.run())
        .await
        .map_err(|err| AppError::unexpected(format!("export task failed: {err}")))??;

    log_next_steps(&report, &settings.site);
    Ok(())
}

fn log_next_steps(report: &ExportReport, site: &SiteMetadata) {
    let output = report.output_dir.display();
    info!(target = "linksly::export", "Next steps:");
    info!(target = "linksly::export", "  1. git add {output}/");
    info!(
        target = "linksly::export",
        "  2. git commit -m \"Update static site\""
    );
    info!(target = "linksly::export", "  3. git push");
    info!(
        target = "linksly::export",
        "  4. Enable GitHub Pages from the `{output}` folder, then visit {}",
        site.canonical_url()
    );
}
