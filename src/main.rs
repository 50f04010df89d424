mod app;
mod cli;
mod constants;
mod particles;
mod storage;
mod timer;

fn main() {
    cli::run_cli();
}
