#![no_main]

use collab_manager_core::{Command, CommandKind, InvocationContext};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let context = InvocationContext::new("octo", "admin", 1);
    let Ok(command) = Command::parse(context, &raw) else {
        return;
    };
    let validated = command.validate();
    if command.kind() == CommandKind::None {
        assert!(validated.is_ok());
    }
    assert_eq!(command.repositories().len(), command.repository_specs().len());
});
