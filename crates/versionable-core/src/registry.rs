//! Per-type versioning state.
//!
//! The registry is built once at startup and handed to whatever performs
//! saves. Enabling a type prepares its storage (see [`crate::setup`]) and
//! returns a [`Versioner`] bound to that type.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tracing::{debug, info};

use crate::commit::CommitEngine;
use crate::config::{TypeOptions, VersioningConfig};
use crate::dispatcher::{TeardownReceipt, Versioner};
use crate::error::{VersionableError, VersionableResult};
use crate::layout::StorageLayout;
use crate::setup::{self, SetupReport};
use crate::snapshot::SnapshotSerializer;
use crate::traits::{RecordSource, VersionControl};
use crate::types::{Versionable, VersionableType};
use crate::vcs::GitCli;

/// Everything needed to version one record type.
#[derive(Debug)]
pub struct TypeVersioning {
    vtype: VersionableType,
    layout: StorageLayout,
    serializer: SnapshotSerializer,
    commit: CommitEngine,
    refresh_collection_on_delete: bool,
    setup: SetupReport,
    // held across {collection, instance, commit}; shared by every type on
    // the same storage root since they share one repository
    write_lock: Arc<Mutex<()>>,
}

impl TypeVersioning {
    /// Naming metadata for the type.
    pub fn vtype(&self) -> &VersionableType {
        &self.vtype
    }

    /// Path layout for the type's storage root.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// The serializer snapshots are written with.
    pub fn serializer(&self) -> &SnapshotSerializer {
        &self.serializer
    }

    /// The commit engine for the type's repository.
    pub fn commit_engine(&self) -> &CommitEngine {
        &self.commit
    }

    /// Whether deletes rewrite the collection snapshot.
    pub fn refresh_collection_on_delete(&self) -> bool {
        self.refresh_collection_on_delete
    }

    /// What setup did when the type was enabled.
    pub fn setup_report(&self) -> SetupReport {
        self.setup
    }

    pub(crate) fn lock(&self) -> VersionableResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| VersionableError::poisoned(&self.vtype.name))
    }
}

/// Receives operator guidance, one line per call.
pub type GuidanceSink = Box<dyn Fn(&str) + Send + Sync>;

/// Holds the versioning state of every enabled type.
pub struct VersioningRegistry {
    config: VersioningConfig,
    vcs: Arc<dyn VersionControl>,
    types: RwLock<HashMap<String, Arc<TypeVersioning>>>,
    root_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
    guidance: GuidanceSink,
    guidance_printed: AtomicBool,
}

impl VersioningRegistry {
    /// Create a registry that commits with the `git` executable.
    pub fn new(config: VersioningConfig) -> VersionableResult<Self> {
        let git = GitCli::from_config(&config)?;
        Ok(Self::with_version_control(config, Arc::new(git)))
    }

    /// Create a registry with a custom version-control adapter.
    pub fn with_version_control(config: VersioningConfig, vcs: Arc<dyn VersionControl>) -> Self {
        Self {
            config,
            vcs,
            types: RwLock::new(HashMap::new()),
            root_locks: Mutex::new(HashMap::new()),
            guidance: Box::new(|line: &str| println!("{}", line)),
            guidance_printed: AtomicBool::new(false),
        }
    }

    /// Send setup guidance somewhere other than stdout.
    pub fn with_guidance_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.guidance = Box::new(sink);
        self
    }

    /// The registry-wide configuration.
    pub fn config(&self) -> &VersioningConfig {
        &self.config
    }

    /// Enable versioning for `T` with the registry's storage root.
    pub fn enable<T: Versionable>(&self) -> VersionableResult<Versioner<T>> {
        self.enable_with::<T>(TypeOptions::default())
    }

    /// Enable versioning for `T` with per-type overrides.
    ///
    /// The first call prepares storage; later calls return the existing
    /// state and ignore `options`.
    pub fn enable_with<T: Versionable>(&self, options: TypeOptions) -> VersionableResult<Versioner<T>> {
        let state = self.enable_type(VersionableType::of::<T>(), options)?;
        Ok(Versioner::new(state))
    }

    /// Untyped form of [`VersioningRegistry::enable_with`].
    pub fn enable_type(
        &self,
        vtype: VersionableType,
        options: TypeOptions,
    ) -> VersionableResult<Arc<TypeVersioning>> {
        if let Some(existing) = self.get(&vtype.name)? {
            debug!(type_name = %vtype.name, "versioning already enabled");
            return Ok(existing);
        }

        let mut types = self
            .types
            .write()
            .map_err(|_| VersionableError::poisoned("registry"))?;
        // another caller may have won the race for the write lock
        if let Some(existing) = types.get(&vtype.name) {
            return Ok(Arc::clone(existing));
        }

        let root = options
            .storage_root
            .unwrap_or_else(|| self.config.storage_root.clone());
        let layout = StorageLayout::new(&root, self.config.format);
        let write_lock = self.root_lock(&root)?;
        let report = {
            let _guard = write_lock
                .lock()
                .map_err(|_| VersionableError::poisoned(&vtype.name))?;
            setup::ensure_ready(&vtype, &layout, self.vcs.as_ref())?
        };

        if report.changed_anything() && self.config.print_setup_guidance {
            self.print_guidance(&layout);
        }

        let state = Arc::new(TypeVersioning {
            serializer: SnapshotSerializer::new(self.config.format),
            commit: CommitEngine::new(root, Arc::clone(&self.vcs)),
            refresh_collection_on_delete: self.config.refresh_collection_on_delete,
            setup: report,
            write_lock,
            layout,
            vtype: vtype.clone(),
        });
        types.insert(vtype.name.clone(), Arc::clone(&state));

        info!(type_name = %vtype.name, table = %vtype.table_name, "versioning enabled");
        Ok(state)
    }

    /// The versioner for an already enabled type.
    pub fn versioner<T: Versionable>(&self) -> VersionableResult<Versioner<T>> {
        self.get(T::TYPE_NAME)?
            .map(Versioner::new)
            .ok_or_else(|| VersionableError::not_registered(T::TYPE_NAME))
    }

    /// Look up a type's state by name.
    pub fn get(&self, type_name: &str) -> VersionableResult<Option<Arc<TypeVersioning>>> {
        let types = self
            .types
            .read()
            .map_err(|_| VersionableError::poisoned("registry"))?;
        Ok(types.get(type_name).cloned())
    }

    /// Names of every enabled type, sorted.
    pub fn registered_types(&self) -> VersionableResult<Vec<String>> {
        let types = self
            .types
            .read()
            .map_err(|_| VersionableError::poisoned("registry"))?;
        let mut names: Vec<String> = types.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Remove `T`'s snapshots, commit, and forget the type.
    pub fn disable<T: Versionable>(
        &self,
        source: &dyn RecordSource<T>,
    ) -> VersionableResult<TeardownReceipt> {
        let receipt = self.versioner::<T>()?.disable(source)?;
        self.types
            .write()
            .map_err(|_| VersionableError::poisoned("registry"))?
            .remove(T::TYPE_NAME);
        Ok(receipt)
    }

    fn root_lock(&self, root: &Path) -> VersionableResult<Arc<Mutex<()>>> {
        let mut locks = self
            .root_locks
            .lock()
            .map_err(|_| VersionableError::poisoned("registry"))?;
        Ok(Arc::clone(locks.entry(root.to_path_buf()).or_default()))
    }

    fn print_guidance(&self, layout: &StorageLayout) {
        if self.guidance_printed.swap(true, Ordering::SeqCst) {
            return;
        }
        let dir_name = layout
            .root()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config.storage_dir_name());
        for line in setup::guidance_lines(layout.root(), &dir_name, &self.config.app_root) {
            (self.guidance)(&line);
        }
    }
}

impl std::fmt::Debug for VersioningRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersioningRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
