use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{ColorCluster, Correction};

use crate::{error::AssistantError, parser::CommandParser};

/// Turns a free-text command into a correction.
#[async_trait]
pub trait CommandInterpreter: Send + Sync {
    async fn interpret(
        &self,
        command: &str,
        current: &[ColorCluster],
    ) -> Result<Correction, AssistantError>;
}

/// Interpreter backed by the local rule table.
#[derive(Debug, Clone, Default)]
pub struct LocalInterpreter {
    parser: Arc<CommandParser>,
}

impl LocalInterpreter {
    pub fn new(parser: CommandParser) -> Self {
        Self {
            parser: Arc::new(parser),
        }
    }

    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }
}

#[async_trait]
impl CommandInterpreter for LocalInterpreter {
    async fn interpret(
        &self,
        command: &str,
        _current: &[ColorCluster],
    ) -> Result<Correction, AssistantError> {
        self.parser
            .parse(command)
            .ok_or_else(|| AssistantError::ParseFailure {
                input: command.to_string(),
            })
    }
}
