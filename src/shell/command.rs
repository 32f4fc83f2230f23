//! Shell command table.

use crate::types::NodeType;

/// One interactive command, selected by its key letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    GoInto,
    GoBack,
    Create(NodeType),
    ChangePermissions,
    Rename,
    Copy,
    Move,
    Erase,
    Write,
    Read,
    Path,
    Quit,
}

impl ShellCommand {
    /// Every command in help order.
    pub const ALL: [ShellCommand; 15] = [
        ShellCommand::Quit,
        ShellCommand::Create(NodeType::File),
        ShellCommand::Create(NodeType::Directory),
        ShellCommand::Create(NodeType::Symlink),
        ShellCommand::ChangePermissions,
        ShellCommand::Rename,
        ShellCommand::Copy,
        ShellCommand::Erase,
        ShellCommand::Write,
        ShellCommand::Read,
        ShellCommand::GoInto,
        ShellCommand::Move,
        ShellCommand::Path,
        ShellCommand::GoBack,
        ShellCommand::Help,
    ];

    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|command| command.key() == key)
    }

    /// Command named by the first character of an input line.
    pub fn parse(line: &str) -> Option<Self> {
        line.trim().chars().next().and_then(Self::from_key)
    }

    pub fn key(self) -> char {
        match self {
            ShellCommand::Help => 'h',
            ShellCommand::GoInto => 'g',
            ShellCommand::GoBack => 'b',
            ShellCommand::Create(NodeType::File) => 'f',
            ShellCommand::Create(NodeType::Directory) => 'd',
            ShellCommand::Create(NodeType::Symlink) => 's',
            ShellCommand::ChangePermissions => 'x',
            ShellCommand::Rename => 'c',
            ShellCommand::Copy => 'o',
            ShellCommand::Move => 'm',
            ShellCommand::Erase => 'e',
            ShellCommand::Write => 'w',
            ShellCommand::Read => 'r',
            ShellCommand::Path => 'p',
            ShellCommand::Quit => 'q',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ShellCommand::Help => "show this help",
            ShellCommand::GoInto => "go into directory",
            ShellCommand::GoBack => "go back to the parent directory",
            ShellCommand::Create(NodeType::File) => "create file",
            ShellCommand::Create(NodeType::Directory) => "create directory",
            ShellCommand::Create(NodeType::Symlink) => "create symbolic link",
            ShellCommand::ChangePermissions => "change node permissions",
            ShellCommand::Rename => "change name",
            ShellCommand::Copy => "copy node to location",
            ShellCommand::Move => "move node to new location",
            ShellCommand::Erase => "erase node",
            ShellCommand::Write => "write text to file",
            ShellCommand::Read => "read content from file",
            ShellCommand::Path => "print node path",
            ShellCommand::Quit => "quit",
        }
    }
}
