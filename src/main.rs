use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = course_tidy::cli::parse();
    app::run(args)
}
