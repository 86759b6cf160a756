use crate::context::Context;
use ruc::Result;
use serde::{Deserialize, Serialize};

/// A action (module function and argument values) that can be executed.
pub trait Executable {
    /// The caller
    type Origin;
    /// The call to execute
    type Call;

    /// Actually execute this action and return the result of it.
    fn execute(
        origin: Option<Self::Origin>,
        call: Self::Call,
        ctx: &Context,
    ) -> Result<ActionResult>;
}

/// Something that can validate unsigned transactions for the transaction pool.
pub trait ValidateUnsigned {
    /// The call to validate
    type Call;

    /// Validate the call right before execute.
    ///
    /// Changes made to storage WILL be persisted if the call returns `Ok`.
    fn pre_execute(call: &Self::Call, ctx: &Context) -> Result<()> {
        Self::validate_unsigned(call, ctx)
    }

    /// Return the validity of the call
    ///
    /// Changes made to storage should be discarded by caller.
    fn validate_unsigned(call: &Self::Call, ctx: &Context) -> Result<()>;
}

/// A transaction whose signer, if any, has already been authenticated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CheckedTransaction<Address, Call> {
    /// The function signer, if anyone
    pub signed: Option<Address>,

    /// The function that should be called.
    pub function: Call,
}

impl<Address, Call> CheckedTransaction<Address, Call> {
    pub fn new_signed(function: Call, signed: Address) -> Self {
        Self {
            signed: Some(signed),
            function,
        }
    }

    pub fn new_unsigned(function: Call) -> Self {
        Self {
            signed: None,
            function,
        }
    }
}

/// A checked transaction ready to run against a module.
pub trait Applyable {
    type Origin;
    type Call;

    /// Signed transactions are always acceptable here, unsigned ones only
    /// if the module lets them through.
    fn validate<V: ValidateUnsigned<Call = Self::Call>>(&self, ctx: &Context) -> Result<()>;

    /// Run the call, unsigned calls go through `pre_execute` first.
    fn apply<V>(self, ctx: &Context) -> Result<ActionResult>
    where
        V: ValidateUnsigned<Call = Self::Call>,
        V: Executable<Origin = Self::Origin, Call = Self::Call>;
}

impl<Address, Call> Applyable for CheckedTransaction<Address, Call> {
    type Origin = Address;
    type Call = Call;

    fn validate<V: ValidateUnsigned<Call = Self::Call>>(&self, ctx: &Context) -> Result<()> {
        match self.signed {
            Some(_) => Ok(()),
            None => V::validate_unsigned(&self.function, ctx),
        }
    }

    fn apply<V>(self, ctx: &Context) -> Result<ActionResult>
    where
        V: ValidateUnsigned<Call = Self::Call>,
        V: Executable<Origin = Self::Origin, Call = Self::Call>,
    {
        if self.signed.is_none() {
            V::pre_execute(&self.function, ctx)?;
        }
        V::execute(self.signed, self.function, ctx)
    }
}

/// A typed event emitted by a module, e.g. `withdraw_rewards`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: String,
    pub attributes: Vec<(String, String)>,
}

impl Event {
    pub fn new(kind: &str) -> Self {
        Event {
            kind: kind.to_string(),
            attributes: vec![],
        }
    }

    pub fn attr<V: ToString>(mut self, key: &str, value: V) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }
}

/// Action execution result in the transaction.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ActionResult {
    /// Data is any data returned from message or handler execution.
    pub data: Vec<u8>,
    /// Log contains the log information from message or handler execution.
    pub log: String,
    /// gas_wanted is the maximum units of work we allow this tx to perform.
    pub gas_wanted: u64,
    /// gas_used is the amount of gas actually consumed.
    pub gas_used: u64,
    /// Events contains a slice of Event objects that were emitted during message
    /// or handler execution.
    pub events: Vec<Event>,
}
