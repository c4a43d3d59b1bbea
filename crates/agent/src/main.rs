use restock_agent::AgentConfig;

fn main() -> anyhow::Result<()> {
    restock_observability::init();

    let config = AgentConfig::from_env()?;
    restock_agent::run(config)
}
