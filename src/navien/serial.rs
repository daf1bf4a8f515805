//! # Navien Serial Communication
//!
//! Async serial plumbing around the poll-driven protocol engine. The
//! handle owns the port and the engine, pumping received bytes into the
//! engine's UART buffer on each poll and flushing whatever frames the
//! engine queued for transmission.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::SerialPortBuilderExt;

use crate::error::NavienError;
use crate::navien::protocol::{NavienLink, NavienVisitor};
use crate::navien::uart::UartBuffer;

/// Configuration for the serial connection. Navien units talk 19200 8N1
/// over RS-485.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baudrate: u32,
    /// Upper bound on a single poll's read wait; an expired wait simply
    /// means no bytes arrived this tick.
    pub poll_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baudrate: 19200,
            poll_timeout: Duration::from_millis(50),
        }
    }
}

/// Handle to a Navien bus attached via a serial port, encapsulating the
/// `tokio_serial::SerialStream` and the protocol engine.
pub struct NavienDeviceHandle {
    port: tokio_serial::SerialStream,
    config: SerialConfig,
    link: NavienLink<UartBuffer>,
}

impl NavienDeviceHandle {
    /// Open the serial port with default settings.
    pub async fn connect(port_name: &str) -> Result<NavienDeviceHandle, NavienError> {
        Self::connect_with_config(port_name, SerialConfig::default()).await
    }

    /// Open the serial port with custom config.
    pub async fn connect_with_config(
        port_name: &str,
        config: SerialConfig,
    ) -> Result<NavienDeviceHandle, NavienError> {
        let port = tokio_serial::new(port_name, config.baudrate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .timeout(config.poll_timeout)
            .open_native_async()
            .map_err(|e| NavienError::SerialPortError(e.to_string()))?;

        Ok(NavienDeviceHandle {
            port,
            config,
            link: NavienLink::new(UartBuffer::new()),
        })
    }

    /// One polling tick: pull whatever bytes the port has, run the
    /// engine over them, then flush anything the engine queued for
    /// transmission. An empty tick is not an error.
    pub async fn poll(&mut self) -> Result<(), NavienError> {
        use tokio::time::timeout;

        let mut buf = [0u8; 256];
        match timeout(self.config.poll_timeout, self.port.read(&mut buf)).await {
            Ok(Ok(0)) => {}
            Ok(Ok(n)) => self.link.uart_mut().push_rx(&buf[..n]),
            Ok(Err(e)) => return Err(NavienError::SerialPortError(e.to_string())),
            // Timed out: no bytes this tick.
            Err(_) => {}
        }

        self.link.receive();

        let tx = self.link.uart_mut().drain_tx();
        if !tx.is_empty() {
            self.port
                .write_all(&tx)
                .await
                .map_err(|e| NavienError::SerialPortError(e.to_string()))?;
            self.port
                .flush()
                .await
                .map_err(|e| NavienError::SerialPortError(e.to_string()))?;
        }
        Ok(())
    }

    /// Closes the serial port connection.
    pub async fn disconnect(&mut self) -> Result<(), NavienError> {
        // SerialStream has no close method; dropping the handle closes it.
        Ok(())
    }

    /// Register a visitor for one cascade slot. See
    /// [`NavienLink::add_visitor`].
    pub fn add_visitor(&mut self, visitor: Box<dyn NavienVisitor>, slot: usize) {
        self.link.add_visitor(visitor, slot);
    }

    pub fn link(&self) -> &NavienLink<UartBuffer> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut NavienLink<UartBuffer> {
        &mut self.link
    }
}
