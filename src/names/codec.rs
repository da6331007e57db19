//! Name operations inside output scripts.
//!
//! Wire format of a registration:
//!
//! ```text
//! OP_RETURN OP_NAME_REGISTER <name> <address-script>
//! ```
//!
//! A script that does not start with `OP_RETURN <name opcode>` is simply not a
//! name operation. One that does start that way but fails the grammar is
//! rejected outright and never treated as an ordinary output.

use crate::core::{Script, Transaction, OP_NAME_REGISTER};
use crate::error::{BlockchainError, Result};
use crate::names::{Name, NameData};
use bitcoin::opcodes::all::OP_RETURN;
use bitcoin::opcodes::Opcode;
use bitcoin::script::{Builder, Instruction, PushBytes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameOpKind {
    Register,
}

impl NameOpKind {
    pub fn from_opcode(opcode: Opcode) -> Option<NameOpKind> {
        if opcode == OP_NAME_REGISTER {
            Some(NameOpKind::Register)
        } else {
            None
        }
    }

    pub fn opcode(self) -> Opcode {
        match self {
            NameOpKind::Register => OP_NAME_REGISTER,
        }
    }

    /// Number of pushes following the name.
    fn arg_count(self) -> usize {
        match self {
            NameOpKind::Register => 1,
        }
    }
}

/// A decoded, well-formed name operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameOperation {
    kind: NameOpKind,
    name: Name,
    args: Vec<Vec<u8>>,
}

impl NameOperation {
    pub fn kind(&self) -> NameOpKind {
        self.kind
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn args(&self) -> &[Vec<u8>] {
        self.args.as_slice()
    }

    /// The record a registration binds to its name.
    pub fn name_data(&self) -> NameData {
        match self.kind {
            NameOpKind::Register => NameData::new(Script::from_bytes(self.args[0].clone())),
        }
    }
}

/// Decode an output script.
///
/// Returns `Ok(None)` for scripts that are not name operations and
/// `Err(NameFormat)` for scripts that look like one but are malformed.
pub fn decode_name_script(script: &Script) -> Result<Option<NameOperation>> {
    let mut instructions = script.instructions();

    match instructions.next() {
        Some(Ok(Instruction::Op(OP_RETURN))) => {}
        _ => return Ok(None),
    }
    let kind = match instructions.next() {
        Some(Ok(Instruction::Op(opcode))) => match NameOpKind::from_opcode(opcode) {
            Some(kind) => kind,
            None => return Ok(None),
        },
        _ => return Ok(None),
    };

    let mut pushes: Vec<Vec<u8>> = Vec::new();
    for instruction in instructions {
        match instruction {
            Ok(Instruction::PushBytes(data)) => pushes.push(data.as_bytes().to_vec()),
            Ok(Instruction::Op(opcode)) => {
                return Err(BlockchainError::NameFormat(format!(
                    "non-push opcode {opcode} in name script arguments"
                )))
            }
            Err(e) => {
                return Err(BlockchainError::NameFormat(format!(
                    "fetching name script arguments failed: {e}"
                )))
            }
        }
    }

    if pushes.is_empty() {
        return Err(BlockchainError::NameFormat(
            "no name found in name script".to_string(),
        ));
    }
    let name = Name::from_bytes(pushes.remove(0));

    if pushes.len() != kind.arg_count() {
        return Err(BlockchainError::NameFormat(format!(
            "wrong argument count for name operation: expected {}, got {}",
            kind.arg_count(),
            pushes.len()
        )));
    }

    Ok(Some(NameOperation {
        kind,
        name,
        args: pushes,
    }))
}

fn push_bytes(data: &[u8]) -> Result<&PushBytes> {
    <&PushBytes>::try_from(data).map_err(|e| {
        BlockchainError::NameFormat(format!("push of {} bytes not encodable: {e}", data.len()))
    })
}

/// Build the output script registering `name` for `data`.
pub fn construct_name_registration(name: &Name, data: &NameData) -> Result<Script> {
    let script = Builder::new()
        .push_opcode(OP_RETURN)
        .push_opcode(NameOpKind::Register.opcode())
        .push_slice(push_bytes(name.as_bytes())?)
        .push_slice(push_bytes(data.get_address().as_bytes())?)
        .into_script();
    Ok(Script::from(script))
}

/// Names registered by the outputs of `tx`, in output order.
pub fn registered_names(tx: &Transaction) -> Result<Vec<Name>> {
    let mut names = Vec::new();
    for output in tx.get_vout() {
        if let Some(op) = decode_name_script(output.get_script_pubkey())? {
            if op.kind() == NameOpKind::Register {
                names.push(op.name);
            }
        }
    }
    Ok(names)
}
