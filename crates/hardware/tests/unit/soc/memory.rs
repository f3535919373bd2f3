//! # Memory Region Tests
//!
//! SRAM access, flash erase state and write protection, and image loading.

use pretty_assertions::assert_eq;
use stm32sim_core::common::GuestError;
use stm32sim_core::soc::devices::Device;
use stm32sim_core::soc::memory::Memory;

#[test]
fn test_memory_ram_starts_zeroed() {
    let mut ram = Memory::ram("SRAM1", 0x2000_0000, 64);
    assert_eq!(ram.len(), 64);
    assert!(!ram.is_empty());
    assert_eq!(ram.read_u64(0), 0);
    assert_eq!(ram.address_range(), (0x2000_0000, 64));
    assert_eq!(ram.name(), "SRAM1");
}

#[test]
fn test_memory_ram_is_little_endian() {
    let mut ram = Memory::ram("SRAM", 0, 16);
    ram.write_u32(4, 0x1122_3344);
    assert_eq!(ram.read_u8(4), 0x44);
    assert_eq!(ram.read_u16(6), 0x1122);
}

#[test]
fn test_memory_accesses_straddling_the_end_read_zero_and_drop_writes() {
    let mut ram = Memory::ram("SRAM", 0, 8);
    ram.write_u64(4, u64::MAX);
    assert_eq!(ram.read_u64(0), 0);
    assert_eq!(ram.read_u32(6), 0);
}

#[test]
fn test_memory_flash_is_erased_and_read_only_to_the_guest() {
    let mut flash = Memory::flash(0x0800_0000, 32);
    assert_eq!(flash.name(), "FLASH");
    assert_eq!(flash.read_u32(0), 0xFFFF_FFFF);

    flash.write_u32(0, 0);

    assert_eq!(flash.read_u32(0), 0xFFFF_FFFF);
    assert_eq!(
        flash.guest_errors().last(),
        Some(GuestError::ReadOnlyRegister(0))
    );
}

#[test]
fn test_memory_load_bypasses_protection_and_truncates() {
    let mut flash = Memory::flash(0x0800_0000, 8);
    flash.load(&[1, 2, 3, 4, 5, 6], 4);
    assert_eq!(flash.read_u32(4), 0x0403_0201);
    assert_eq!(flash.read_u32(0), 0xFFFF_FFFF);

    flash.load(&[9], 100);
    assert_eq!(flash.guest_errors().count(), 0);
}

#[test]
fn test_memory_alias_shares_storage_and_protection() {
    let mut sram = Memory::ram("SRAM2", 0x1000_0000, 16);
    let mut alias = sram.alias("SRAM2_ALIAS", 0x2003_0000);
    assert_eq!(alias.address_range(), (0x2003_0000, 16));
    assert_eq!(alias.name(), "SRAM2_ALIAS");

    alias.write_u32(8, 0xDEAD_BEEF);
    assert_eq!(sram.read_u32(8), 0xDEAD_BEEF);

    let mut flash = Memory::flash(0x0800_0000, 8);
    let mut boot = flash.alias("FLASH_ALIAS", 0);
    flash.load(&[0x11, 0x22], 0);
    assert_eq!(boot.read_u16(0), 0x2211);

    boot.write_u8(0, 0);
    assert_eq!(flash.read_u8(0), 0x11);
    assert_eq!(
        boot.guest_errors().last(),
        Some(GuestError::ReadOnlyRegister(0))
    );
    assert_eq!(flash.guest_errors().count(), 0);
}
