//! Shell loop and command dispatch.

use super::command::ShellCommand;
use super::help::help_text;
use super::presentation::{format_error, format_listing};
use crate::config::ShellConfig;
use crate::error::{ApiError, TreeError};
use crate::session::Session;
use crate::tree::ROOT_MARKER;
use crate::types::{NodeId, NodeType, Permissions};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

pub const PROMPT: &str = "Input command('h' for help): ";

/// Interactive shell over any line reader and writer.
pub struct Shell<R, W> {
    session: Session,
    config: ShellConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(session: Session, config: ShellConfig, input: R, output: W) -> Self {
        Self {
            session,
            config,
            input,
            output,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Run until `q` or end of input. Only I/O failures end the loop early.
    pub fn run(&mut self) -> Result<(), ApiError> {
        info!("Shell started");
        loop {
            writeln!(self.output)?;
            self.print_listing()?;
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            let Some(command) = ShellCommand::parse(&line) else {
                writeln!(self.output, "Invalid input.")?;
                continue;
            };
            if command == ShellCommand::Quit {
                break;
            }

            debug!(key = %command.key(), "Dispatching command");
            match self.dispatch(command) {
                Ok(()) => {}
                Err(ApiError::Io(e)) => return Err(ApiError::Io(e)),
                Err(ApiError::Tree(e)) if !e.is_precondition() => {
                    warn!(error = %e, "Command ran out of capacity");
                    writeln!(self.output, "{}", format_error(&e, self.config.color))?;
                }
                Err(e) => {
                    debug!(error = %e, "Command failed");
                    writeln!(self.output, "{}", format_error(&e, self.config.color))?;
                }
            }
        }
        info!("Shell finished");
        Ok(())
    }

    fn dispatch(&mut self, command: ShellCommand) -> Result<(), ApiError> {
        match command {
            ShellCommand::Help => {
                writeln!(self.output, "{}", help_text())?;
            }
            ShellCommand::GoInto => {
                let name = self.prompt("Enter directory name: ")?;
                self.session.change_dir(&name)?;
            }
            ShellCommand::GoBack => self.session.go_back()?,
            ShellCommand::Create(node_type) => self.create(node_type)?,
            ShellCommand::ChangePermissions => {
                let node = self.prompt_child("Enter node name: ")?;
                let permissions: Permissions =
                    self.prompt("Enter new permissions (r=4, w=2, x=1): ")?.parse()?;
                self.session.tree_mut().change_permissions(node, permissions)?;
            }
            ShellCommand::Rename => {
                let node = self.prompt_child("Enter node name: ")?;
                let new_name = self.prompt("Enter new name: ")?;
                self.session.tree_mut().rename(node, &new_name)?;
            }
            ShellCommand::Copy => {
                let node = self.prompt_child("Enter node name: ")?;
                let location = self.prompt_location("Enter location name: ")?;
                self.session.tree_mut().copy(location, node)?;
            }
            ShellCommand::Move => {
                let node = self.prompt_child("Enter node name: ")?;
                let location = self.prompt_location("Enter new location directory name: ")?;
                self.session.tree_mut().relocate(node, location)?;
            }
            ShellCommand::Erase => {
                let node = self.prompt_child("Enter node name: ")?;
                let cwd = self.session.cwd();
                self.session.tree_mut().delete(cwd, node)?;
            }
            ShellCommand::Write => {
                let node = self.prompt_child("Enter file name: ")?;
                let text = self.read_text()?;
                self.session.tree_mut().write_file(node, &text)?;
            }
            ShellCommand::Read => {
                let node = self.prompt_child("Enter file name: ")?;
                if let Some(content) = self.session.tree().read_file(node)? {
                    write!(self.output, "{}", content)?;
                    if !content.ends_with('\n') {
                        writeln!(self.output)?;
                    }
                }
            }
            ShellCommand::Path => {
                let node = self.prompt_child("Enter node name: ")?;
                let path = self
                    .session
                    .tree()
                    .path_of(node)
                    .ok_or_else(|| ApiError::InvalidInput("node is not reachable from the root".to_string()))?;
                writeln!(self.output, "{}", path)?;
            }
            ShellCommand::Quit => {}
        }
        Ok(())
    }

    fn create(&mut self, node_type: NodeType) -> Result<(), ApiError> {
        let name = self.prompt(&format!("Enter {} name: ", node_type.label()))?;
        if name.trim() == ROOT_MARKER {
            return Err(TreeError::ReservedName(ROOT_MARKER.to_string()).into());
        }
        let permissions = self.config.default_permissions.for_type(node_type);
        let cwd = self.session.cwd();
        let node = self
            .session
            .tree_mut()
            .create(cwd, Some(&name), node_type, permissions)?;

        if node_type == NodeType::Symlink {
            let target_name = self.prompt("Enter symlink target's name: ")?;
            let tree = self.session.tree();
            match tree.find_in_tree(tree.root(), &target_name) {
                Some(target) => self.session.tree_mut().set_symlink_target(node, Some(target))?,
                None => writeln!(
                    self.output,
                    "No node named '{}'; the link is left dangling.",
                    target_name
                )?,
            }
        }
        Ok(())
    }

    fn print_listing(&mut self) -> Result<(), ApiError> {
        let lines = format_listing(self.session.tree(), self.session.cwd(), self.config.color);
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<String, ApiError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()?
            .ok_or_else(|| ApiError::InvalidInput("unexpected end of input".to_string()))
    }

    fn prompt_child(&mut self, text: &str) -> Result<NodeId, ApiError> {
        let name = self.prompt(text)?;
        Ok(self.session.child(&name)?)
    }

    /// A child of the current directory, followed through symlinks.
    fn prompt_location(&mut self, text: &str) -> Result<NodeId, ApiError> {
        let location = self.prompt_child(text)?;
        Ok(self.session.tree().try_resolve_symlink(location)?)
    }

    /// Lines up to the EOF marker (or end of input), each terminated by a newline.
    fn read_text(&mut self) -> Result<String, ApiError> {
        writeln!(
            self.output,
            "Enter text (type '{}' on a new line to finish):",
            self.config.eof_marker
        )?;
        self.output.flush()?;
        let mut text = String::new();
        while let Some(line) = self.read_line()? {
            if line == self.config.eof_marker {
                break;
            }
            text.push_str(&line);
            text.push('\n');
        }
        Ok(text)
    }

    fn read_line(&mut self) -> Result<Option<String>, ApiError> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}
