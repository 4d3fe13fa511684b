use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use whirr_auth::Proof;
use whirr_protocol::{parse_request_line, parse_submission, Request, Response};
use whirr_query::QueryEngine;
use whirr_schema::SchemaRegistry;
use whirr_update::{UpdateError, UpdatePipeline, UpdateRequest};

use crate::error::ServerResult;

/// Everything a connection needs to answer requests. Shared, immutable.
pub struct AppContext {
    pub engine: QueryEngine,
    pub pipeline: Arc<UpdatePipeline>,
    pub schemas: Arc<SchemaRegistry>,
}

/// Serve one client connection: a line-per-request loop.
///
/// Queries are single lines; a line reading `update` opens a submission
/// block terminated by a lone `.`. The connection closes on EOF or `!q`.
/// Dropping this future (client disconnect) abandons any in-flight work.
pub async fn handle_connection(stream: TcpStream, ctx: Arc<AppContext>) -> ServerResult<()> {
    let (read_half, mut writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(()); // EOF
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.eq_ignore_ascii_case("update") {
            let mut block = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).await? == 0 {
                    return Ok(()); // EOF inside a block: drop it
                }
                if line.trim() == "." {
                    break;
                }
                block.push_str(&line);
            }
            let response = handle_update(&ctx, &block).await;
            writer.write_all(response.render(&ctx.schemas).as_bytes()).await?;
            writer.flush().await?;
            continue;
        }

        let response = match parse_request_line(trimmed) {
            Ok(Request::Quit) => return Ok(()),
            Ok(Request::Query(query)) => match ctx.engine.resolve(&query) {
                Ok(result) => Response::from_query(result),
                Err(e) => Response::Error(e.to_string()),
            },
            Err(e) => Response::Error(e.to_string()),
        };
        writer.write_all(response.render(&ctx.schemas).as_bytes()).await?;
        writer.flush().await?;
    }
}

/// Run one submission block through the pipeline.
///
/// Each supplied proof is tried in order until one authorizes; signature
/// verification is CPU-bound and runs off the async scheduler.
async fn handle_update(ctx: &Arc<AppContext>, block: &str) -> Response {
    let submission = match parse_submission(block) {
        Ok(submission) => submission,
        Err(e) => return Response::Error(e.to_string()),
    };

    let mut last_denial = Response::Error(UpdateError::AuthorizationDenied.to_string());
    for request in submission.to_requests() {
        let result = submit(ctx, request).await;
        match result {
            Ok(outcome) => return Response::UpdateOk(outcome),
            Err(UpdateError::AuthorizationDenied) => {
                last_denial = Response::Error(UpdateError::AuthorizationDenied.to_string());
            }
            // Anything other than a denial is the same for every proof;
            // report it immediately.
            Err(e) => return Response::Error(e.to_string()),
        }
    }
    last_denial
}

async fn submit(
    ctx: &Arc<AppContext>,
    request: UpdateRequest,
) -> Result<whirr_update::UpdateOutcome, UpdateError> {
    match request.proof {
        Some(Proof::Signature { .. }) => {
            let pipeline = Arc::clone(&ctx.pipeline);
            tokio::task::spawn_blocking(move || pipeline.submit(&request))
                .await
                .unwrap_or(Err(UpdateError::AuthorizationDenied))
        }
        _ => ctx.pipeline.submit(&request),
    }
}
