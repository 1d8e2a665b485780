//! UDP socket setup
//!
//! Binding and multicast configuration for the control channel and the
//! subscriber's sender.

use std::future::Future;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::protocol::constants::MULTICAST_TTL;

/// Something that can send a datagram to an address
///
/// The fan-out path is written against this trait so delivery failures can
/// be injected in tests.
pub trait DatagramSender: Send + Sync + 'static {
    fn send_to(
        &self,
        buf: &[u8],
        target: SocketAddr,
    ) -> impl Future<Output = io::Result<usize>> + Send;
}

impl DatagramSender for UdpSocket {
    fn send_to(
        &self,
        buf: &[u8],
        target: SocketAddr,
    ) -> impl Future<Output = io::Result<usize>> + Send {
        UdpSocket::send_to(self, buf, target)
    }
}

/// Bind the publisher's control socket
///
/// With a `group`, the port is bound with address reuse so several publishers
/// on one host can share it, and the socket joins the group on all
/// interfaces. Without one, the bind is exclusive.
pub async fn bind_control(bind_addr: SocketAddr, group: Option<Ipv4Addr>) -> io::Result<UdpSocket> {
    let Some(group) = group else {
        return UdpSocket::bind(bind_addr).await;
    };

    let socket = Socket::new(Domain::for_address(bind_addr), Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&bind_addr.into())?;

    let socket = UdpSocket::from_std(socket.into())?;
    configure_multicast(&socket, group)?;

    Ok(socket)
}

/// Bind an ephemeral socket for talking to `target`
///
/// If `target` is an IPv4 multicast group the socket also joins it, as
/// subscribers of the control group do.
pub async fn bind_sender(target: SocketAddr) -> io::Result<UdpSocket> {
    let socket = UdpSocket::bind(unspecified_for(target)).await?;

    if let IpAddr::V4(group) = target.ip() {
        if group.is_multicast() {
            configure_multicast(&socket, group)?;
        }
    }

    Ok(socket)
}

/// Bind an ephemeral socket on the same address family and IP as `local`
pub async fn bind_alongside(local: SocketAddr) -> io::Result<UdpSocket> {
    UdpSocket::bind(SocketAddr::new(local.ip(), 0)).await
}

/// Local address the OS would use to reach `target`
///
/// Used to advertise a concrete callback IP when the receive socket is bound
/// to the unspecified address.
pub async fn local_ip_toward(target: SocketAddr) -> io::Result<IpAddr> {
    let probe = UdpSocket::bind(unspecified_for(target)).await?;
    probe.connect(target).await?;
    Ok(probe.local_addr()?.ip())
}

fn configure_multicast(socket: &UdpSocket, group: Ipv4Addr) -> io::Result<()> {
    socket.set_multicast_ttl_v4(MULTICAST_TTL)?;
    socket.set_multicast_loop_v4(true)?;
    socket.join_multicast_v4(group, Ipv4Addr::UNSPECIFIED)?;

    tracing::debug!(group = %group, ttl = MULTICAST_TTL, "Joined multicast group");
    Ok(())
}

fn unspecified_for(target: SocketAddr) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    }
}
