mod cli;

use std::io::Read;
use std::path::Path;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

use xcursorctx::context::{resolve_default_size, resolve_theme};
use xcursorctx::{
    ContextError, CursorContext, CursorTransport, ProcessEnvironment, ResourceKey, Resources,
    ScreenGeometry, resource,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("X11 connect failed: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Show { display, screen } => show(display.as_deref(), screen),
        Command::Parse {
            file,
            width,
            height,
        } => parse(file.as_deref(), width, height),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "xcursorctx failed");
        eprintln!("xcursorctx: {e}");
        std::process::exit(1);
    }
}

fn show(display: Option<&str>, screen: Option<usize>) -> Result<(), CliError> {
    let (conn, default_screen) = x11rb::connect(display)?;
    let screen_num = screen.unwrap_or(default_screen);
    tracing::info!(screen = screen_num, "connected to X11 display");

    let ctx = CursorContext::from_connection(&conn, screen_num)?;
    print_context(&ctx);
    ctx.destroy();
    Ok(())
}

fn print_context<T: CursorTransport>(ctx: &CursorContext<T>) {
    let screen = ctx.screen();
    field("root", format!("0x{:08x}", ctx.root()));
    field("screen", format!("{}x{}", screen.width, screen.height));
    field("cursor font", format!("0x{:08x}", ctx.cursor_font()));
    field("theme", ctx.theme());
    field("size", ctx.size());
    match ctx.pict_format() {
        Some(format) => field("argb32", format!("0x{:08x}", format.id)),
        None => field("argb32", "(not offered)"),
    }
    print_resources(ctx.resources());
}

fn print_resources(resources: &Resources) {
    for key in ResourceKey::ALL {
        match resources.get(key) {
            Some(value) => field(key.name(), format!("{value:?}")),
            None => field(key.name(), "(unset)"),
        }
    }
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!("{:<15}{value}", format!("{label}:"));
}

fn parse(file: Option<&Path>, width: u16, height: u16) -> Result<(), CliError> {
    let resources = match file {
        Some(path) => resource::read_file(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            resource::parse(Some(buf.as_slice()))
        }
    };

    let screen = ScreenGeometry {
        root: 0,
        width,
        height,
    };
    print_resources(&resources);
    field("theme", resolve_theme(&ProcessEnvironment, &resources));
    field(
        "size",
        resolve_default_size(&ProcessEnvironment, &resources, screen),
    );
    Ok(())
}
