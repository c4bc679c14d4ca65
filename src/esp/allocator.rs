//! Heap setup for the radio and the two network stacks.
//!
//! The reclaimed region is the second-stage bootloader's DRAM, free once the
//! app runs, and holds `esp-radio`'s driver state. The main heap holds the
//! radio's RX/TX buffers, which in AP+STA mode serve both interfaces, plus
//! the DHCP server's UDP buffers and the soft-AP peer table.

/// Reclaimed RAM heap size (from bootloader sections)
const RECLAIMED_HEAP_SIZE: usize = 98768;

/// Main heap size for radio buffers, both interfaces and event handlers
const MAIN_HEAP_SIZE: usize = 128 * 1024;

/// Register both heap regions. Call once, before the radio is touched.
///
/// # Panics
///
/// Panics if the regions cannot be reserved.
pub fn init_heap() {
    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: RECLAIMED_HEAP_SIZE);
    esp_alloc::heap_allocator!(size: MAIN_HEAP_SIZE);
}
