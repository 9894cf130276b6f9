//! Simulated directory tree for `cd` and `ls`
//!
//! A fixed tree; nothing here touches a real filesystem and nothing can
//! create or delete entries.

use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

/// Tree layout; `~` is the user's home, a trailing `/` marks a directory
const LAYOUT: &[&str] = &[
    "/bin/",
    "/etc/",
    "/etc/hosts",
    "/etc/profile",
    "/home/",
    "~/",
    "~/Documents/",
    "~/Documents/notes.txt",
    "~/Documents/resume.pdf",
    "~/Downloads/",
    "~/Music/",
    "~/Pictures/",
    "~/Projects/",
    "~/Projects/scripts/",
    "~/Projects/web-os/",
    "~/Projects/web-os/README.md",
    "~/Projects/web-os/src/",
    "/tmp/",
    "/usr/",
    "/usr/bin/",
    "/usr/share/",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Dir,
    File,
}

/// One directory entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: NodeKind,
}

/// Read-only directory tree keyed by absolute path
#[derive(Clone, Debug)]
pub struct FileTree {
    nodes: BTreeMap<String, NodeKind>,
    home: String,
}

impl FileTree {
    /// Build the tree with `/home/<user>` as home
    pub fn new(user: &str) -> Self {
        let home = format!("/home/{}", user);
        let mut nodes = BTreeMap::from([("/".to_string(), NodeKind::Dir)]);
        for raw in LAYOUT {
            let expanded = match raw.strip_prefix('~') {
                Some(rest) => format!("{}{}", home, rest),
                None => raw.to_string(),
            };
            let (path, kind) = match expanded.strip_suffix('/') {
                Some(dir) => (dir.to_string(), NodeKind::Dir),
                None => (expanded, NodeKind::File),
            };
            nodes.insert(path, kind);
        }
        Self { nodes, home }
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn kind(&self, path: &str) -> Option<NodeKind> {
        self.nodes.get(path).copied()
    }

    /// Resolve `arg` against `cwd` into a normalized absolute path
    ///
    /// Handles `~`, `.`, `..` and repeated slashes. The result may not
    /// exist.
    pub fn normalize(&self, cwd: &str, arg: &str) -> String {
        let joined = if arg.is_empty() || arg == "~" {
            self.home.clone()
        } else if let Some(rest) = arg.strip_prefix("~/") {
            format!("{}/{}", self.home, rest)
        } else if arg.starts_with('/') {
            arg.to_string()
        } else {
            format!("{}/{}", cwd, arg)
        };

        let mut parts: Vec<&str> = Vec::new();
        for segment in joined.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                name => parts.push(name),
            }
        }
        format!("/{}", parts.join("/"))
    }

    /// Resolve `arg` to an existing directory
    pub fn resolve_dir(&self, cwd: &str, arg: &str) -> AppResult<String> {
        let path = self.normalize(cwd, arg);
        match self.kind(&path) {
            Some(NodeKind::Dir) => Ok(path),
            Some(NodeKind::File) => Err(AppError::NotADirectory(arg.to_string())),
            None => Err(AppError::NoSuchPath(arg.to_string())),
        }
    }

    /// Children of the directory at `path`, sorted by name
    pub fn list(&self, path: &str) -> AppResult<Vec<Entry>> {
        match self.kind(path) {
            Some(NodeKind::Dir) => {}
            Some(NodeKind::File) => return Err(AppError::NotADirectory(path.to_string())),
            None => return Err(AppError::NoSuchPath(path.to_string())),
        }
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{}/", path)
        };
        let entries = self
            .nodes
            .range(prefix.clone()..)
            .take_while(|(p, _)| p.starts_with(&prefix))
            .filter_map(|(p, kind)| {
                let name = &p[prefix.len()..];
                (!name.is_empty() && !name.contains('/')).then(|| Entry {
                    name: name.to_string(),
                    kind: *kind,
                })
            })
            .collect();
        Ok(entries)
    }
}
