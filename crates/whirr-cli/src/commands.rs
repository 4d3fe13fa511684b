use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use whirr_rpsl::{parse_object, split_paragraphs};
use whirr_server::{AppContext, ServerConfig, WhoisServer};

use crate::cli::{Cli, Command};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve { config, bind, seed } => serve(config, bind, seed),
    }
}

fn serve(
    config_path: Option<PathBuf>,
    bind: Option<SocketAddr>,
    seed: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ServerConfig::from_toml_str(&text)?
        }
        None => ServerConfig::default(),
    };
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }

    let server = WhoisServer::new(config)?;
    if let Some(path) = seed {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading seed dump {}", path.display()))?;
        let loaded = load_seed(server.context(), &text);
        tracing::info!(loaded, "seed dump loaded");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

/// Load a blank-line-separated RPSL dump through the unauthenticated
/// mirror path. Returns how many objects were stored; broken blocks are
/// logged and skipped, never fatal.
pub fn load_seed(ctx: &std::sync::Arc<AppContext>, text: &str) -> usize {
    let mut loaded = 0;
    for block in split_paragraphs(text) {
        let object = match parse_object(block, &ctx.schemas) {
            Ok(object) => object,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unparseable seed object");
                continue;
            }
        };
        let key = match ctx.pipeline.key_for(&object) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(error = %e, "skipping seed object without usable key");
                continue;
            }
        };
        match ctx.pipeline.mirror_upsert(object, key) {
            Ok(_) => loaded += 1,
            Err(e) => tracing::warn!(error = %e, "skipping seed object"),
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use whirr_query::{Query, QueryResponse};

    fn test_server() -> WhoisServer {
        WhoisServer::new(ServerConfig::default()).unwrap()
    }

    #[test]
    fn load_seed_counts_good_objects_and_skips_bad() {
        let server = test_server();
        let dump = "\
mntner: A-MNT\nadmin-c: JD1-TEST\nsource: TEST\n\
\n\
this is not rpsl\n\
\n\
aut-num: AS65000\nas-name: EXAMPLE\nsource: TEST\n";
        let loaded = load_seed(server.context(), dump);
        assert_eq!(loaded, 2);

        let response = server
            .context()
            .engine
            .resolve(&Query::exact("AS65000"))
            .unwrap();
        assert!(matches!(response, QueryResponse::Objects(objects) if objects.len() == 1));
    }

    #[test]
    fn load_seed_from_config_roundtrip() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr = \"127.0.0.1:0\"").unwrap();
        writeln!(file, "sources = [\"TEST\"]").unwrap();
        let text = fs::read_to_string(file.path()).unwrap();
        let config = ServerConfig::from_toml_str(&text).unwrap();
        assert_eq!(config.sources, vec!["TEST"]);
    }
}
