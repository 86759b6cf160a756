use crate::context::{BlockHeader, Context};
use ruc::Result;
use serde::{Deserialize, Serialize};

/// Query request routed to a module, `path` excludes the module name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestQuery {
    pub path: String,
    pub data: Vec<u8>,
    pub height: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseQuery {
    /// Zero on success.
    pub code: u32,
    pub log: String,
    pub value: Vec<u8>,
    pub height: u64,
}

impl ResponseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_code(&mut self, code: u32) {
        self.code = code;
    }

    pub fn set_log(&mut self, log: String) {
        self.log = log;
    }

    pub fn set_value(&mut self, value: Vec<u8>) {
        self.value = value;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestBeginBlock {
    pub hash: Vec<u8>,
    pub header: BlockHeader,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestEndBlock {
    pub height: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseEndBlock {
    pub events: Vec<crate::transaction::Event>,
}

/// AppModuleBasic is the standard form for basic non-dependant elements of an application module.
pub trait AppModuleBasic {
    /// Returns the module's name.
    fn name(&self) -> String;

    /// Returns default genesis state as raw bytes for the module.
    fn default_genesis(&self) -> Vec<u8>;

    /// Performs genesis state validation for the module.
    fn validate_genesis(&self, data: &[u8]) -> Result<()>;

    /// Version of the module's state layout, bumped on every migration.
    fn consensus_version(&self) -> u64 {
        1
    }
}

/// AppModuleGenesis is the standard form for an application module genesis functions
pub trait AppModuleGenesis {
    /// Performs genesis initialization for the module.
    fn init_genesis(&self, ctx: &Context, data: &[u8]) -> Result<()>;

    /// Returns the exported genesis state as raw bytes for the module.
    fn export_genesis(&self, ctx: &Context) -> Result<Vec<u8>>;
}

/// In-place upgrades of a module's stored state.
pub trait AppModuleMigration: AppModuleBasic {
    /// Bring the stored state from `from_version` up to `consensus_version()`.
    fn run_migrations(&self, ctx: &Context, from_version: u64) -> Result<()>;
}

/// AppModule is the standard form for an application module
pub trait AppModule: AppModuleBasic + AppModuleGenesis {
    /// query_route returns the application module's query response.
    fn query_route(
        &self,
        _ctx: Context,
        _path: Vec<&str>,
        _req: &RequestQuery,
    ) -> ResponseQuery {
        ResponseQuery::new()
    }

    /// Called at the start of processing a block of transactions.
    ///
    /// An error rejects the whole block.
    fn begin_block(&mut self, _ctx: &mut Context, _req: &RequestBeginBlock) -> Result<()> {
        Ok(())
    }

    /// Called at the end of the block.
    fn end_block(&mut self, _ctx: &mut Context, _req: &RequestEndBlock) -> ResponseEndBlock {
        ResponseEndBlock::default()
    }
}
