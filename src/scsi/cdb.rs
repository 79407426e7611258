//! Group 0 command descriptor blocks
//!
//! Each command the tool sends is a variant of [`Cdb`]. Variants carry only
//! the fields that command defines; [`Cdb::encode`] lays them out into a
//! freshly zeroed 6-byte array following the SCSI-2/SPC byte offsets:
//!
//! | Command          | 0    | 1          | 2                 | 3          | 4                    | 5       |
//! |------------------|------|------------|-------------------|------------|----------------------|---------|
//! | INQUIRY          | 0x12 | EVPD (b0)  | page code         | alloc MSB  | alloc LSB            | control |
//! | MODE SENSE(6)    | 0x1A | DBD (b3)   | PC (b7-6) + page  | subpage    | allocation length    | control |
//! | START STOP UNIT  | 0x1B | IMMED (b0) | reserved          | reserved   | LOEJ (b1) + START (b0) | control |

use super::constants::{scsi_commands, VPD_UNIT_SERIAL_NUMBER};

pub const CDB6_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cdb {
    /// Standard INQUIRY (`evpd == false`) or a vital product data page
    Inquiry {
        evpd: bool,
        page_code: u8,
        allocation_length: u16,
    },
    /// MODE SENSE(6)
    ModeSense {
        disable_block_descriptors: bool,
        page_control: u8,
        page_code: u8,
        subpage_code: u8,
        allocation_length: u8,
    },
    /// START STOP UNIT, which is LOAD UNLOAD on sequential-access devices
    StartStopUnit {
        immediate: bool,
        load_eject: bool,
        start: bool,
    },
}

impl Cdb {
    pub fn standard_inquiry(allocation_length: u16) -> Self {
        Cdb::Inquiry {
            evpd: false,
            page_code: 0,
            allocation_length,
        }
    }

    pub fn serial_number_inquiry(allocation_length: u16) -> Self {
        Cdb::Inquiry {
            evpd: true,
            page_code: VPD_UNIT_SERIAL_NUMBER,
            allocation_length,
        }
    }

    pub fn mode_sense(page_code: u8, page_control: u8, allocation_length: u8) -> Self {
        Cdb::ModeSense {
            disable_block_descriptors: false,
            page_control,
            page_code,
            subpage_code: 0,
            allocation_length,
        }
    }

    pub fn load() -> Self {
        Cdb::StartStopUnit {
            immediate: false,
            load_eject: false,
            start: true,
        }
    }

    pub fn operation_code(&self) -> u8 {
        match self {
            Cdb::Inquiry { .. } => scsi_commands::INQUIRY,
            Cdb::ModeSense { .. } => scsi_commands::MODE_SENSE_6,
            Cdb::StartStopUnit { .. } => scsi_commands::LOAD_UNLOAD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cdb::Inquiry { evpd: false, .. } => "INQUIRY",
            Cdb::Inquiry { evpd: true, .. } => "INQUIRY (VPD)",
            Cdb::ModeSense { .. } => "MODE SENSE(6)",
            Cdb::StartStopUnit { .. } => "START STOP UNIT",
        }
    }

    pub fn encode(&self) -> [u8; CDB6_LEN] {
        let mut cdb = [0u8; CDB6_LEN];
        cdb[0] = self.operation_code();

        match *self {
            Cdb::Inquiry {
                evpd,
                page_code,
                allocation_length,
            } => {
                cdb[1] = evpd as u8;
                cdb[2] = page_code;
                cdb[3] = (allocation_length >> 8) as u8;
                cdb[4] = (allocation_length & 0xFF) as u8;
            }
            Cdb::ModeSense {
                disable_block_descriptors,
                page_control,
                page_code,
                subpage_code,
                allocation_length,
            } => {
                cdb[1] = (disable_block_descriptors as u8) << 3;
                cdb[2] = ((page_control & 0x03) << 6) | (page_code & 0x3F);
                cdb[3] = subpage_code;
                cdb[4] = allocation_length;
            }
            Cdb::StartStopUnit {
                immediate,
                load_eject,
                start,
            } => {
                cdb[1] = immediate as u8;
                cdb[4] = ((load_eject as u8) << 1) | start as u8;
            }
        }

        cdb
    }
}
