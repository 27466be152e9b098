//! Serial port transport.
//!
//! Wraps the `serialport` crate behind the [`Transport`] contract with the
//! standard 8N1 configuration radio modules expect.

use std::io::Read;
use std::time::Duration;

use serialport::SerialPort;

use crate::error::TransportError;
use crate::transport::Transport;

/// A blocking serial port transport.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open a serial port with 8N1 framing and no flow control.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, TransportError> {
        let mut port = serialport::new(path, baud_rate)
            .timeout(Duration::from_millis(100))
            .open()
            .map_err(serial_error)?;
        port.set_data_bits(serialport::DataBits::Eight)
            .map_err(serial_error)?;
        port.set_parity(serialport::Parity::None)
            .map_err(serial_error)?;
        port.set_stop_bits(serialport::StopBits::One)
            .map_err(serial_error)?;
        port.set_flow_control(serialport::FlowControl::None)
            .map_err(serial_error)?;
        Ok(SerialTransport { port })
    }

    /// Wrap an already-opened port.
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        SerialTransport { port }
    }
}

/// Names of the serial ports present on the system.
pub fn available_ports() -> Result<Vec<String>, TransportError> {
    Ok(serialport::available_ports()
        .map_err(serial_error)?
        .into_iter()
        .map(|port| port.port_name)
        .collect())
}

fn serial_error(err: serialport::Error) -> TransportError {
    TransportError::Io(std::io::Error::from(err))
}

impl Transport for SerialTransport {
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, TransportError> {
        self.port.set_timeout(timeout).map_err(serial_error)?;
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(err) if err.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(err) => Err(TransportError::Io(err)),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        std::io::Write::write_all(&mut self.port, data)?;
        Ok(())
    }
}
