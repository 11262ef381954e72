// Listener module
// Builds the TCP listening socket for the serve loop

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Create the `TcpListener` the serve loop accepts on.
///
/// `SO_REUSEADDR` is set so an immediate restart after shutdown can rebind
/// through TIME_WAIT. `SO_REUSEPORT` is deliberately not set: a second
/// live instance on the same port must fail at bind time.
pub fn bind_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;

    // Non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
