use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollglow::{
    Document as _, ElementId, EnhanceConfig, PageEvent, PageFixture, PageSession,
    SyntheticDocument, SyntheticWindow,
};

#[derive(Parser, Debug)]
#[command(name = "scrollglow", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a page session against a synthetic page and report its state after each scroll.
    Simulate(SimulateArgs),
    /// Validate a configuration file.
    CheckConfig(CheckConfigArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Page fixture JSON (viewport, reduced-motion answer, element tree).
    #[arg(long)]
    page: PathBuf,

    /// Configuration JSON; stock selectors when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scroll offsets visited in order.
    #[arg(long = "scroll", num_args = 1.., allow_negative_numbers = true)]
    scroll: Vec<f64>,

    /// Also start the decorative effects.
    #[arg(long)]
    decorations: bool,
}

#[derive(Parser, Debug)]
struct CheckConfigArgs {
    /// Configuration JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(serde::Serialize, Debug)]
struct StepReport {
    step: usize,
    scroll_y: f64,
    active_section: Option<String>,
    revealed: Vec<String>,
    pending_reveals: usize,
    listeners: usize,
    frames: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EnhanceConfig> {
    match path {
        Some(p) => EnhanceConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(EnhanceConfig::default()),
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let fixture = PageFixture::from_path(&args.page)
        .with_context(|| format!("load page '{}'", args.page.display()))?;
    let config = load_config(args.config.as_ref())?;
    let (mut doc, mut window) = fixture.build().context("build synthetic page")?;

    let mut session =
        PageSession::start(&mut doc, &mut window, config).context("start page session")?;
    if args.decorations {
        session.init_decorations(&mut doc, &mut window);
    }

    for (step, &y) in args.scroll.iter().enumerate() {
        window.set_scroll_y(y);
        session.dispatch(&mut doc, &mut window, PageEvent::Scroll);
        let frames = window.take_frames();
        for &token in &frames {
            session.dispatch(&mut doc, &mut window, PageEvent::Frame(token));
        }
        let report = report(step, &session, &doc, &window, frames.len());
        println!("{}", serde_json::to_string(&report)?);
    }

    session.cleanup(&mut doc, &mut window);
    Ok(())
}

fn report(
    step: usize,
    session: &PageSession,
    doc: &SyntheticDocument,
    window: &SyntheticWindow,
    frames: usize,
) -> StepReport {
    use scrollglow::Window as _;

    StepReport {
        step,
        scroll_y: window.viewport().scroll_y,
        active_section: session.active_section().map(str::to_string),
        revealed: session
            .reveal()
            .revealed()
            .iter()
            .map(|&el| label(doc, el))
            .collect(),
        pending_reveals: session.reveal().pending(),
        listeners: window.listener_count(),
        frames,
    }
}

fn label(doc: &SyntheticDocument, el: ElementId) -> String {
    doc.element_id(el).map_or_else(
        || format!("{}@{}", doc.tag_name(el).unwrap_or("?"), el.0),
        |id| format!("#{id}"),
    )
}

fn cmd_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    let config = load_config(Some(&args.config))?;
    println!(
        "ok: reveal '{}' / '{}', sections '{}', gap policy {:?}",
        config.reveal.single_selector,
        config.reveal.stagger_selector,
        config.nav.section_selector,
        config.nav.gap_policy
    );
    Ok(())
}
