//! In-memory tape system for tests. Records every open, CDB, volume control
//! and close so tests can assert on handle lifecycles.

use std::cell::RefCell;
use std::rc::Rc;

use super::{InterfaceSet, TapeSystem};
use crate::error::{LtfsCmdError, Result};
use crate::scsi::{scsi_commands, DataDirection, ScsiDevice, VolumeControl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(String),
    OpenFailed(String),
    Close(String),
    Cdb(Vec<u8>),
    Volume(VolumeControl),
    ReleaseInterfaces,
}

#[derive(Debug, Clone)]
pub struct FakeInterface {
    /// `None` simulates a failing interface detail query
    pub path: Option<String>,
    pub open_ok: bool,
    pub device_number: Option<u32>,
    pub vendor: String,
    pub product: String,
    pub revision: String,
    pub serial: String,
    /// Raw serial number page overriding `serial`
    pub serial_page: Option<Vec<u8>>,
    pub inquiry_ok: bool,
    pub serial_ok: bool,
    pub mode_sense_ok: bool,
    pub load_ok: bool,
    pub lock_ok: bool,
    pub dismount_ok: bool,
    pub eject_ok: bool,
}

impl FakeInterface {
    pub fn drive(path: &str, device_number: u32, vendor: &str, product: &str, serial: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            open_ok: true,
            device_number: Some(device_number),
            vendor: vendor.to_string(),
            product: product.to_string(),
            revision: "J5SW".to_string(),
            serial: serial.to_string(),
            serial_page: None,
            inquiry_ok: true,
            serial_ok: true,
            mode_sense_ok: true,
            load_ok: true,
            lock_ok: true,
            dismount_ok: true,
            eject_ok: true,
        }
    }

    pub fn unresolved() -> Self {
        let mut interface = Self::drive("", 0, "", "", "");
        interface.path = None;
        interface
    }

    fn inquiry_response(&self) -> Vec<u8> {
        let mut data = vec![0u8; 96];
        data[0] = 0x01;
        data[4] = 91;
        copy_padded(&mut data[8..16], &self.vendor);
        copy_padded(&mut data[16..32], &self.product);
        copy_padded(&mut data[32..36], &self.revision);
        data
    }

    fn serial_response(&self) -> Vec<u8> {
        if let Some(page) = &self.serial_page {
            return page.clone();
        }
        let mut data = vec![0x01, 0x80, 0x00, self.serial.len() as u8];
        data.extend_from_slice(self.serial.as_bytes());
        data
    }
}

fn copy_padded(dest: &mut [u8], value: &str) {
    dest.fill(b' ');
    let len = value.len().min(dest.len());
    dest[..len].copy_from_slice(&value.as_bytes()[..len]);
}

pub struct FakeTapeSystem {
    interfaces: Vec<FakeInterface>,
    online_volumes: RefCell<Vec<String>>,
    enumeration_fails: bool,
    events: Rc<RefCell<Vec<Event>>>,
}

impl FakeTapeSystem {
    pub fn new(interfaces: Vec<FakeInterface>) -> Self {
        Self {
            interfaces,
            online_volumes: RefCell::new(Vec::new()),
            enumeration_fails: false,
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn failing_enumeration() -> Self {
        let mut system = Self::new(vec![]);
        system.enumeration_fails = true;
        system
    }

    /// Make `\\.\<letter>:` openable
    pub fn set_volume_online(&self, letter: char) {
        self.online_volumes
            .borrow_mut()
            .push(format!(r"\\.\{}:", letter));
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn issued_cdbs(&self) -> Vec<Vec<u8>> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Cdb(cdb) => Some(cdb.clone()),
                _ => None,
            })
            .collect()
    }
}

impl TapeSystem for FakeTapeSystem {
    fn tape_interfaces(&self) -> Result<Box<dyn InterfaceSet + '_>> {
        if self.enumeration_fails {
            return Err(LtfsCmdError::system("SetupDiGetClassDevs failed"));
        }
        Ok(Box::new(FakeInterfaceSet {
            interfaces: &self.interfaces,
            events: Rc::clone(&self.events),
        }))
    }

    fn open(&self, device_path: &str) -> Result<Box<dyn ScsiDevice>> {
        if self
            .online_volumes
            .borrow()
            .iter()
            .any(|v| v == device_path)
        {
            self.events
                .borrow_mut()
                .push(Event::Open(device_path.to_string()));
            let mut volume = FakeInterface::drive(device_path, 0, "", "", "");
            volume.inquiry_ok = false;
            return Ok(Box::new(FakeDevice {
                path: device_path.to_string(),
                interface: volume,
                events: Rc::clone(&self.events),
            }));
        }

        let interface = self
            .interfaces
            .iter()
            .find(|i| i.path.as_deref() == Some(device_path) && i.open_ok);

        match interface {
            Some(interface) => {
                self.events
                    .borrow_mut()
                    .push(Event::Open(device_path.to_string()));
                Ok(Box::new(FakeDevice {
                    path: device_path.to_string(),
                    interface: interface.clone(),
                    events: Rc::clone(&self.events),
                }))
            }
            None => {
                self.events
                    .borrow_mut()
                    .push(Event::OpenFailed(device_path.to_string()));
                Err(LtfsCmdError::tape_device(format!(
                    "Cannot open device {}",
                    device_path
                )))
            }
        }
    }
}

struct FakeInterfaceSet<'a> {
    interfaces: &'a [FakeInterface],
    events: Rc<RefCell<Vec<Event>>>,
}

impl InterfaceSet for FakeInterfaceSet<'_> {
    fn device_path(&mut self, index: u32) -> Option<Result<String>> {
        let interface = self.interfaces.get(index as usize)?;
        Some(
            interface
                .path
                .clone()
                .ok_or_else(|| LtfsCmdError::system("interface detail query failed")),
        )
    }
}

impl Drop for FakeInterfaceSet<'_> {
    fn drop(&mut self) {
        self.events.borrow_mut().push(Event::ReleaseInterfaces);
    }
}

struct FakeDevice {
    path: String,
    interface: FakeInterface,
    events: Rc<RefCell<Vec<Event>>>,
}

impl ScsiDevice for FakeDevice {
    fn device_path(&self) -> &str {
        &self.path
    }

    fn storage_device_number(&mut self) -> Result<u32> {
        self.interface
            .device_number
            .ok_or_else(|| LtfsCmdError::tape_device("IOCTL_STORAGE_GET_DEVICE_NUMBER failed"))
    }

    fn scsi_io_control(
        &mut self,
        cdb: &[u8],
        data_buffer: Option<&mut [u8]>,
        direction: DataDirection,
        _timeout: u32,
    ) -> Result<bool> {
        self.events.borrow_mut().push(Event::Cdb(cdb.to_vec()));

        let (ok, response) = match cdb[0] {
            scsi_commands::INQUIRY if cdb[1] & 0x01 == 0 => {
                (self.interface.inquiry_ok, self.interface.inquiry_response())
            }
            scsi_commands::INQUIRY => (self.interface.serial_ok, self.interface.serial_response()),
            scsi_commands::MODE_SENSE_6 => (self.interface.mode_sense_ok, vec![0x1B, 0, 0, 0]),
            scsi_commands::LOAD_UNLOAD => (self.interface.load_ok, Vec::new()),
            _ => (false, Vec::new()),
        };

        if !ok {
            return Ok(false);
        }

        if let (Some(buffer), DataDirection::In) = (data_buffer, direction) {
            let len = response.len().min(buffer.len());
            buffer[..len].copy_from_slice(&response[..len]);
        }

        Ok(true)
    }

    fn volume_control(&mut self, control: VolumeControl) -> Result<bool> {
        self.events.borrow_mut().push(Event::Volume(control));
        Ok(match control {
            VolumeControl::Lock => self.interface.lock_ok,
            VolumeControl::Dismount => self.interface.dismount_ok,
            VolumeControl::EjectMedia => self.interface.eject_ok,
        })
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        self.events.borrow_mut().push(Event::Close(self.path.clone()));
    }
}
