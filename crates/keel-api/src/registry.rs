//! # API Module Registry
//!
//! Feature crates contribute their API surface as [`ApiModule`]s: a named,
//! versioned axum router plus the matching OpenAPI fragment. The registry
//! collects modules from the hosting application and from shared crates (via
//! [`ModuleProvider`]), then the pipeline mounts every module under
//! `/{group}/{module-name}` where `group` is the canonical
//! `v<major>.<minor>.<patch>` version group and the module name is rendered
//! in kebab-case.
//!
//! A version counts as deprecated when every module registered for it is
//! deprecated; the documentation UI and the version report headers surface
//! that flag to clients.

use axum::Router;
use keel_core::{kebab_case, ApiVersion};
use utoipa::openapi::OpenApi;

/// One feature's API contribution for one version.
pub struct ApiModule {
    name: String,
    version: ApiVersion,
    deprecated: bool,
    router: Router,
    openapi: OpenApi,
}

impl ApiModule {
    /// Create a module. The name is kebab-cased immediately so multi-word
    /// names render hyphenated and lowercase everywhere they appear.
    pub fn new(
        name: impl AsRef<str>,
        version: ApiVersion,
        router: Router,
        openapi: OpenApi,
    ) -> Self {
        Self {
            name: kebab_case(name.as_ref()),
            version,
            deprecated: false,
            router,
            openapi,
        }
    }

    /// Mark this module's version contribution as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// The kebab-cased module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// The OpenAPI fragment describing this module's routes. Path keys are
    /// module-relative; the explorer rewrites them under the mount path.
    pub fn openapi(&self) -> &OpenApi {
        &self.openapi
    }

    /// The path this module mounts at: `/{group}/{name}`.
    pub fn mount_path(&self) -> String {
        format!("/{}/{}", self.version.group_name(), self.name)
    }
}

impl std::fmt::Debug for ApiModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiModule")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("deprecated", &self.deprecated)
            .finish()
    }
}

/// Extensibility hook for shared crates that contribute modules to a host
/// application's registry alongside the host's own.
pub trait ModuleProvider {
    /// Build this provider's modules. Called once during registration.
    fn modules(&self) -> Vec<ApiModule>;
}

/// Startup-time collection of every registered [`ApiModule`].
///
/// Mutated only during single-threaded startup; the pipeline consumes it and
/// nothing mutates the routing table afterwards.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<ApiModule>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a locally-defined module.
    pub fn register(&mut self, module: ApiModule) -> &mut Self {
        if self
            .modules
            .iter()
            .any(|m| m.name == module.name && m.version == module.version)
        {
            tracing::warn!(
                module = %module.name,
                version = %module.version,
                "module already registered for this version; keeping both routers"
            );
        }
        self.modules.push(module);
        self
    }

    /// Register every module contributed by a shared provider.
    pub fn register_provider(&mut self, provider: &dyn ModuleProvider) -> &mut Self {
        for module in provider.modules() {
            self.register(module);
        }
        self
    }

    pub fn modules(&self) -> &[ApiModule] {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Every registered version, ascending and deduplicated.
    pub fn versions(&self) -> Vec<ApiVersion> {
        let mut versions: Vec<ApiVersion> = self.modules.iter().map(|m| m.version).collect();
        versions.sort();
        versions.dedup();
        versions
    }

    /// Versions whose every registered module is deprecated.
    pub fn deprecated_versions(&self) -> Vec<ApiVersion> {
        self.versions()
            .into_iter()
            .filter(|v| self.is_version_deprecated(*v))
            .collect()
    }

    /// Whether every module registered for `version` is deprecated.
    pub fn is_version_deprecated(&self, version: ApiVersion) -> bool {
        let mut any = false;
        for module in self.modules.iter().filter(|m| m.version == version) {
            if !module.deprecated {
                return false;
            }
            any = true;
        }
        any
    }

    /// Consume the registry, nesting every module router at its mount path.
    pub fn into_service_router(self) -> Router {
        let mut router = Router::new();
        for module in self.modules {
            let path = module.mount_path();
            tracing::debug!(module = %module.name, path = %path, "mounting API module");
            router = router.nest(&path, module.router);
        }
        router
    }
}
