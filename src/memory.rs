use std::cmp;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

/*
 * MemoryRegion
 * A flat, power-of-two sized byte buffer. Every address is masked into
 * range before the buffer is touched so wraparound is defined behavior,
 * never an out of bounds access.
 *
 * Allocation cannot fail the caller: when the backing buffer cannot be
 * reserved the region degrades to a single byte with `is_valid()` false,
 * and the caller must check validity before running anything.
 */
#[derive(Debug)]
pub struct MemoryRegion {
    bytes: Vec<u8>,
    mask: usize,
    base: usize,
    valid: bool,
}

impl MemoryRegion {
    pub fn allocate(size_pow2: u32) -> MemoryRegion {
        let size = 1_usize << size_pow2;
        let mut bytes: Vec<u8> = Vec::new();

        if bytes.try_reserve_exact(size).is_ok() {
            bytes.resize(size, 0x00);

            MemoryRegion {
                bytes,
                mask: size - 1,
                base: 0,
                valid: true,
            }
        } else {
            MemoryRegion {
                bytes: vec![0x00],
                mask: 0,
                base: 0,
                valid: false,
            }
        }
    }

    pub fn with_base(mut self, base: usize) -> MemoryRegion {
        self.base = base & self.mask;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn highest_address(&self) -> usize {
        self.mask
    }

    /// Translate a base-relative offset into an absolute, masked address.
    pub fn absolute(&self, offset: usize) -> usize {
        (self.base + offset) & self.mask
    }

    pub fn read(&self, address: usize, len: usize) -> Vec<u8> {
        (0..len)
            .map(|index| self.bytes[(address + index) & self.mask])
            .collect()
    }

    pub fn write(&mut self, address: usize, data: &[u8]) {
        for (index, byte) in data.iter().enumerate() {
            let masked = (address + index) & self.mask;
            self.bytes[masked] = *byte;
        }
    }

    pub fn read_byte(&self, address: usize) -> u8 {
        self.bytes[address & self.mask]
    }

    pub fn read_word(&self, address: usize) -> u16 {
        let low = self.read_byte(address) as u16;
        let high = self.read_byte(address + 1) as u16;

        high << 8 | low
    }

    pub fn write_word(&mut self, address: usize, value: u16) {
        self.write(address, &[value as u8, (value >> 8) as u8]);
    }

    /// Copy program bytes in at the given offset. Only as much as fits
    /// between the load point and the highest address is kept, the rest
    /// is silently discarded. Returns the number of bytes loaded.
    pub fn load(&mut self, offset: usize, data: &[u8]) -> usize {
        let start = self.absolute(offset);
        let capacity = self.highest_address() - start + 1;
        let len = cmp::min(capacity, data.len());
        self.bytes[start..start + len].copy_from_slice(&data[..len]);

        len
    }

    /// Dump the whole region to a file, raw bytes.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate() {
        let memory = MemoryRegion::allocate(10);
        assert!(memory.is_valid());
        assert_eq!(1023, memory.highest_address());
        assert_eq!(vec![0x00; 4], memory.read(0x0000, 4));
    }

    #[test]
    fn test_read_write() {
        let mut memory = MemoryRegion::allocate(10);
        memory.write(0x0100, &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(vec![0xde, 0xad, 0xbe, 0xef], memory.read(0x0100, 4));
        assert_eq!(0xad, memory.read_byte(0x0101));
        assert_eq!(0xadde, memory.read_word(0x0100));
    }

    #[test]
    fn test_word_little_endian() {
        let mut memory = MemoryRegion::allocate(10);
        memory.write_word(0x0010, 0x1234);
        assert_eq!(vec![0x34, 0x12], memory.read(0x0010, 2));
        assert_eq!(0x1234, memory.read_word(0x0010));
    }

    #[test]
    fn test_wraparound() {
        let mut memory = MemoryRegion::allocate(8);
        memory.write(0x0100, &[0xaa, 0xbb]);
        assert_eq!(0xaa, memory.read_byte(0x0000));
        assert_eq!(0xbb, memory.read_byte(0x0001));
        assert_eq!(vec![0xaa, 0xbb], memory.read(0x0500, 2));
    }

    #[test]
    fn test_base_offset() {
        let memory = MemoryRegion::allocate(8).with_base(0x80);
        assert_eq!(0x90, memory.absolute(0x10));
        assert_eq!(0x7f, memory.absolute(0xff));
    }

    #[test]
    fn test_load_truncates() {
        let mut memory = MemoryRegion::allocate(4);
        let program = vec![0x42; 32];
        assert_eq!(16, memory.load(0, &program));
        assert_eq!(vec![0x42; 16], memory.read(0, 16));

        let mut memory = MemoryRegion::allocate(4);
        assert_eq!(4, memory.load(12, &program));
    }

    #[test]
    fn test_allocation_degrades_to_invalid_region() {
        // no machine can reserve 2^62 bytes, the region must degrade
        let memory = MemoryRegion::allocate(62);
        assert!(!memory.is_valid());
        assert_eq!(0, memory.highest_address());
        assert_eq!(0x00, memory.read_byte(0x1234));
    }

    #[test]
    fn test_save() {
        let mut memory = MemoryRegion::allocate(4);
        memory.write(0x0000, &[0x01, 0x02, 0x03]);
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("memory.dump");
        memory.save(&path).unwrap();
        assert_eq!(16, std::fs::metadata(&path).unwrap().len());
        assert_eq!(vec![0x01, 0x02, 0x03], std::fs::read(&path).unwrap()[0..3]);
    }
}
