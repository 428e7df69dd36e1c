use crate::arp::{ArpCache, ArpResolver, CacheUpdate};
use crate::classifier::{ByEtherType, Classifier};
use crate::config::StackConfig;
use crate::context::Context;
use crate::device::NetworkDevice;
use crate::errors::{Error, ErrorKind, Reports};
use crate::io::{FrameSink, FrameSource};
use crate::ipv4::IpProcessor;
use crate::log::{Direction, Header, HeaderLog};
use crate::transmit::FrameTransmitter;
use std::io;
use tapstack_packets::{EtherKind, EthernetFrame};
use tracing::{debug, info, trace, warn};

/// Size of the receive buffer. Larger than any frame a TAP device hands out at the default MTU.
pub const RECV_BUFFER_LEN: usize = 2500;

/// What a frame that was handled to completion led to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Handled {
    Arp { update: CacheUpdate, written: usize },
    Ip { written: usize },
}

impl Handled {
    /// Bytes written for the reply.
    pub fn written(&self) -> usize {
        match *self {
            Handled::Arp { written, .. } | Handled::Ip { written } => written,
        }
    }
}

/// The result of one frame: either how it was handled or why it was dropped, plus everything
/// reported along the way.
#[derive(Debug)]
pub struct Outcome {
    pub result: Result<Handled, Error>,
    pub reports: Reports,
}

/// Owns every component and runs frames through them one at a time.
pub struct Stack<S, L> {
    device: NetworkDevice,
    classifier: ByEtherType,
    arp: ArpResolver,
    ip: IpProcessor,
    transmitter: FrameTransmitter<S>,
    log: L,
}

impl<S: FrameSink, L: HeaderLog> Stack<S, L> {
    pub fn new(config: &StackConfig, sink: S, log: L) -> Self {
        Stack {
            device: config.device(),
            classifier: ByEtherType::new(),
            arp: ArpResolver::new(config.target_policy),
            ip: IpProcessor::new(config.target_policy),
            transmitter: FrameTransmitter::new(sink),
            log,
        }
    }

    pub fn device(&self) -> &NetworkDevice {
        &self.device
    }

    pub fn arp_cache(&self) -> &ArpCache {
        self.arp.cache()
    }

    pub fn sink(&self) -> &S {
        self.transmitter.sink()
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut L {
        &mut self.log
    }

    /// Handles one received frame to completion, including any reply.
    pub fn process_frame(&mut self, data: Vec<u8>) -> Outcome {
        let mut reports = Reports::new();
        let result = self.dispatch(data, &mut reports);
        Outcome { result, reports }
    }

    fn dispatch(&mut self, data: Vec<u8>, reports: &mut Reports) -> Result<Handled, Error> {
        let frame = EthernetFrame::from_buffer(data)?;
        let kind = self.classifier.classify(&frame);
        if let EtherKind::Unsupported(ether_type) = kind {
            return Err(Error::UnsupportedEtherType(ether_type));
        }
        self.log.log(Header::Ethernet(&frame), Direction::Incoming);

        let mut cx = Context {
            device: &self.device,
            transmitter: &mut self.transmitter,
            log: &mut self.log,
            reports,
        };
        match kind {
            EtherKind::Arp => {
                let (update, written) = self.arp.handle_incoming(&mut cx, frame)?;
                Ok(Handled::Arp { update, written })
            }
            EtherKind::Ipv4 => {
                let written = self.ip.incoming(&mut cx, frame)?;
                Ok(Handled::Ip { written })
            }
            EtherKind::Unsupported(ether_type) => Err(Error::UnsupportedEtherType(ether_type)),
        }
    }

    /// Reads and handles frames until the source closes. Interrupted, timed out and would-block
    /// reads are retried; any other read error ends the loop. Errors for individual frames,
    /// including failed writes, are logged and the loop carries on.
    pub fn run<R: FrameSource>(&mut self, source: &mut R) -> Result<(), Error> {
        let mut buf = vec![0; RECV_BUFFER_LEN];
        loop {
            let len = match source.recv(&mut buf) {
                Ok(0) => {
                    info!("frame source closed");
                    return Ok(());
                }
                Ok(len) => len,
                Err(err) => match err.kind() {
                    io::ErrorKind::Interrupted
                    | io::ErrorKind::WouldBlock
                    | io::ErrorKind::TimedOut => continue,
                    _ => return Err(Error::Io(err)),
                },
            };
            trace!("received {} byte frame", len);

            match self.process_frame(buf[..len].to_vec()).result {
                Ok(handled) => debug!("{:?}", handled),
                Err(err) => match err.kind() {
                    ErrorKind::UnsupportedEtherType => trace!("{}", err),
                    ErrorKind::NotForUs => info!("dropped frame: {}", err),
                    _ => warn!("dropped frame: {}", err),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::NullHeaderLog;
    use crate::utils::test::frame_collectors::{CollectingSink, ScriptedSource};
    use crate::utils::test::frame_generators::arp_request;
    use std::net::Ipv4Addr;
    use tapstack_packets::MacAddr;

    fn stack() -> (
        Stack<CollectingSink, NullHeaderLog>,
        crossbeam::crossbeam_channel::Receiver<Vec<u8>>,
    ) {
        let (sink, frames) = CollectingSink::new();
        (Stack::new(&StackConfig::new(), sink, NullHeaderLog), frames)
    }

    fn request() -> Vec<u8> {
        arp_request(
            Ipv4Addr::new(10, 0, 0, 5),
            MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]),
            Ipv4Addr::new(10, 0, 0, 4),
        )
    }

    #[test]
    fn runt_frames_are_truncated() {
        let (mut stack, frames) = stack();
        let outcome = stack.process_frame(vec![0; 13]);
        assert_eq!(outcome.result.unwrap_err().kind(), ErrorKind::Truncated);
        assert!(frames.try_recv().is_err());
    }

    #[test]
    fn unknown_ether_types_are_ignored() {
        let (mut stack, frames) = stack();
        let mut frame = vec![0; 60];
        frame[12] = 0x86;
        frame[13] = 0xdd;
        let outcome = stack.process_frame(frame);
        match outcome.result {
            Err(Error::UnsupportedEtherType(0x86dd)) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(outcome.reports.is_empty());
        assert!(frames.try_recv().is_err());
    }

    #[test]
    fn arp_dispatch() {
        let (mut stack, frames) = stack();
        let outcome = stack.process_frame(request());
        assert_eq!(
            outcome.result.unwrap(),
            Handled::Arp {
                update: CacheUpdate::Inserted,
                written: 42
            }
        );
        assert_eq!(frames.try_recv().unwrap().len(), 42);
        assert_eq!(stack.arp_cache().len(), 1);
    }

    #[test]
    fn run_retries_transient_errors() {
        let (mut stack, frames) = stack();
        let mut source = ScriptedSource::new()
            .error(io::ErrorKind::Interrupted)
            .frame(request())
            .error(io::ErrorKind::WouldBlock)
            .error(io::ErrorKind::TimedOut)
            .frame(request());
        stack.run(&mut source).unwrap();
        assert_eq!(frames.try_iter().count(), 2);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn run_stops_on_hard_errors() {
        let (mut stack, frames) = stack();
        let mut source = ScriptedSource::new()
            .error(io::ErrorKind::PermissionDenied)
            .frame(request());
        let err = stack.run(&mut source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(source.remaining(), 1);
        assert!(frames.try_recv().is_err());
    }

    #[test]
    fn oversized_reads_are_cut_to_the_buffer() {
        let (mut stack, frames) = stack();
        let mut frame = request();
        frame.resize(RECV_BUFFER_LEN + 100, 0);
        let mut source = ScriptedSource::from_frames(vec![frame]);
        stack.run(&mut source).unwrap();
        assert_eq!(frames.try_recv().unwrap().len(), 42);
    }
}
