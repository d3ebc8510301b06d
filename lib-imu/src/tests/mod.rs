use std::collections::HashMap;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};


/// Register file of a single chip behind an i2c address. Register pointer writes auto increment
/// like on the real chips, writes to `bank_register` switch the active bank.
/// 
pub struct FakeBus
{
    pub address: u8,
    pub bank_register: Option<u8>,
    pub bank: u8,
    pub registers: HashMap<(u8, u8), u8>,
    /// Every register write as `(bank, register, value)`.
    pub writes: Vec<(u8, u8, u8)>,
    pub fail: bool,
}

impl FakeBus
{
    pub fn new(address: u8, bank_register: Option<u8>) -> Self {
        FakeBus { address, bank_register, bank: 0, registers: HashMap::new(), writes: Vec::new(), fail: false }
    }

    pub fn with_register(mut self, bank: u8, register: u8, value: u8) -> Self {
        self.registers.insert((bank, register), value);
        self
    }

    /// Store `[x, y, z]` as big endian 16 bit values starting at `register` in bank 0.
    pub fn set_vector(&mut self, register: u8, values: [i16; 3]) {
        for (i, value) in values.iter().enumerate() {
            let [high, low] = value.to_be_bytes();
            self.registers.insert((0, register + (i as u8) * 2), high);
            self.registers.insert((0, register + (i as u8) * 2 + 1), low);
        }
    }

    pub fn written(&self, bank: u8, register: u8) -> Option<u8> {
        self.writes.iter().rev().find(|(b, r, _)| *b == bank && *r == register).map(|(_, _, v)| *v)
    }
}

impl ErrorType for FakeBus
{
    type Error = ErrorKind;
}

impl I2c for FakeBus
{
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        if self.fail || address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let mut pointer = 0u8;
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((register, data)) = bytes.split_first() else { continue };
                    pointer = *register;
                    for value in data {
                        if Some(pointer) == self.bank_register {
                            self.bank = *value;
                        }
                        self.writes.push((self.bank, pointer, *value));
                        self.registers.insert((self.bank, pointer), *value);
                        pointer = pointer.wrapping_add(1);
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = self.registers.get(&(self.bank, pointer)).copied().unwrap_or(0);
                        pointer = pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct NoDelay
{
    pub total_ns: u64,
}

impl DelayNs for NoDelay
{
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}
