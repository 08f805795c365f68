//! Status command implementation

use is25lp_core::spi::{FunctionRegister, StatusRegister};
use is25lp_core::transport::Transport;
use is25lp_core::Is25lp;

fn flag(set: bool) -> &'static str {
    if set {
        "set"
    } else {
        "clear"
    }
}

/// Print the status and function registers and the unique ID
pub fn run_status<T: Transport>(flash: &mut Is25lp<T>) -> Result<(), Box<dyn std::error::Error>> {
    let sr = flash.read_status()?;
    let fr = flash.read_function_register()?;
    let mut uid = [0u8; 16];
    flash.read_unique_id(&mut uid)?;

    println!("Status register:   0x{:02X}", sr.bits());
    println!("  WIP  (busy):       {}", flag(sr.is_busy()));
    println!("  WEL  (write en.):  {}", flag(sr.is_write_enabled()));
    println!("  BP3..BP0:          {}", sr.protection_level());
    println!("  QE   (quad en.):   {}", flag(sr.contains(StatusRegister::QE)));
    println!("  SRWD:              {}", flag(sr.contains(StatusRegister::SRWD)));
    println!();
    println!("Function register: 0x{:02X}", fr.bits());
    println!("  Program suspended: {}", flag(fr.contains(FunctionRegister::PSUS)));
    println!("  Erase suspended:   {}", flag(fr.contains(FunctionRegister::ESUS)));
    let locked: Vec<&str> = [
        (FunctionRegister::IRL0, "0"),
        (FunctionRegister::IRL1, "1"),
        (FunctionRegister::IRL2, "2"),
        (FunctionRegister::IRL3, "3"),
    ]
    .iter()
    .filter(|(bit, _)| fr.contains(*bit))
    .map(|&(_, name)| name)
    .collect();
    println!(
        "  Locked info rows:  {}",
        if locked.is_empty() {
            "none".to_string()
        } else {
            locked.join(", ")
        }
    );
    println!();
    println!(
        "Unique ID:         {}",
        uid.iter().map(|b| format!("{:02X}", b)).collect::<String>()
    );

    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::commands::test_util::dummy_flash;
    use is25lp_dummy::DummyConfig;

    #[test]
    fn test_status_reads_registers() {
        let mut flash = dummy_flash(DummyConfig::default());
        run_status(&mut flash).unwrap();

        let opcodes: Vec<u8> = flash
            .transport()
            .transactions()
            .iter()
            .filter_map(|t| t.opcode())
            .collect();
        assert_eq!(opcodes, vec![0x05, 0x48, 0x4B]);
    }
}
