pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}
