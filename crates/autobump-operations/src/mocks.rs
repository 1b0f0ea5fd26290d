use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use autobump_core::{PackageId, PackageView};
use autobump_tree::TreeError;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{CommandRunner, DefinitionWriter, PackageSource, VersionResolver};
use crate::types::Scope;

pub struct MockPackageSource {
    packages: Vec<PackageView>,
    fail: bool,
}

impl MockPackageSource {
    #[must_use]
    pub fn new(packages: Vec<PackageView>) -> Self {
        Self {
            packages,
            fail: false,
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            packages: Vec::new(),
            fail: true,
        }
    }
}

impl PackageSource for MockPackageSource {
    fn packages(&self, roots: &[PathBuf], _scope: Scope) -> Result<Vec<PackageView>> {
        if self.fail {
            let root = roots.first().cloned().unwrap_or_default();
            return Err(TreeError::RootNotFound(root).into());
        }
        Ok(self.packages.clone())
    }
}

/// Answers with a fixed version per package name and fails for any other
/// package.
#[derive(Default)]
pub struct MockResolver {
    versions: HashMap<String, String>,
    calls: Arc<Mutex<Vec<PackageId>>>,
}

impl MockResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_version(mut self, name: &str, version: &str) -> Self {
        self.versions.insert(name.to_string(), version.to_string());
        self
    }

    #[must_use]
    pub fn calls(&self) -> Arc<Mutex<Vec<PackageId>>> {
        Arc::clone(&self.calls)
    }
}

impl VersionResolver for MockResolver {
    fn resolve(&self, package: &PackageView) -> Result<String> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(package.id.clone());

        self.versions
            .get(&package.id.name)
            .cloned()
            .ok_or_else(|| OperationError::HookFailed {
                command: format!("resolve {}", package.id.name),
                status: "exit status: 1".to_string(),
                output: "no upstream version".to_string(),
            })
    }
}

enum MockOutput {
    Success(String),
    Exit(i32),
}

#[derive(Default)]
pub struct MockCommandRunner {
    outputs: HashMap<String, MockOutput>,
    calls: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl MockCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output(mut self, command: &str, output: &str) -> Self {
        self.outputs
            .insert(command.to_string(), MockOutput::Success(output.to_string()));
        self
    }

    #[must_use]
    pub fn with_failure(mut self, command: &str, code: i32) -> Self {
        self.outputs
            .insert(command.to_string(), MockOutput::Exit(code));
        self
    }

    #[must_use]
    pub fn calls(&self) -> Arc<Mutex<Vec<(String, Duration)>>> {
        Arc::clone(&self.calls)
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, command: &str, timeout: Duration) -> Result<String> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push((command.to_string(), timeout));

        match self.outputs.get(command) {
            Some(MockOutput::Success(output)) => Ok(output.clone()),
            Some(MockOutput::Exit(code)) => Err(OperationError::HookFailed {
                command: command.to_string(),
                status: format!("exit status: {code}"),
                output: String::new(),
            }),
            None => Err(OperationError::HookTimeout {
                command: command.to_string(),
                timeout,
            }),
        }
    }
}

/// Records bumps instead of touching the filesystem.
#[derive(Default)]
pub struct MockDefinitionWriter {
    writes: Arc<Mutex<Vec<(PackageId, String)>>>,
    failing: HashSet<String>,
}

impl MockDefinitionWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_for(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    #[must_use]
    pub fn writes(&self) -> Arc<Mutex<Vec<(PackageId, String)>>> {
        Arc::clone(&self.writes)
    }
}

impl DefinitionWriter for MockDefinitionWriter {
    fn apply_bump(&self, package: &PackageView, new_version: &str) -> Result<()> {
        if self.failing.contains(&package.id.name) {
            return Err(OperationError::MissingDefinition {
                package: package.id.package_name(),
                dir: package.dir.clone(),
            });
        }
        self.writes
            .lock()
            .expect("lock poisoned")
            .push((package.id.clone(), new_version.to_string()));
        Ok(())
    }

    fn verify_bump(&self, package: &PackageView, new_version: &str) -> Result<()> {
        let written = self
            .writes
            .lock()
            .expect("lock poisoned")
            .iter()
            .any(|(id, version)| *id == package.id && version == new_version);

        if written {
            Ok(())
        } else {
            Err(OperationError::MissingDefinition {
                package: package.id.package_name(),
                dir: package.dir.clone(),
            })
        }
    }
}
