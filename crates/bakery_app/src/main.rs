use bakery_logging::bakery_error;

mod platform;

fn main() -> anyhow::Result<()> {
    platform::run_app().inspect_err(|err| bakery_error!("Bakery client stopped: {:#}", err))
}
